// Public modules
pub mod chat;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod logging;
pub mod observability;
pub mod render;
pub mod retry;
pub mod types;

// Re-exports
pub use chat::{Chat, ChatCapability, Conversation};
pub use client::{Client, Completions};
pub use config::ChatConfig;
pub use console::Console;
pub use error::{Error, ErrorKind, Result};
pub use input::{BufReadSource, EditorSource, Input, LineSource};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use retry::RetryPolicy;
pub use types::*;

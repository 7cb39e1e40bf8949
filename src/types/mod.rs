// Public modules
pub mod chat_completion;
pub mod chat_completion_params;
pub mod message;
pub mod reply;
pub mod role;
pub mod usage;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, ResponseMessage};
pub use chat_completion_params::ChatCompletionParams;
pub use message::Message;
pub use reply::Reply;
pub use role::{Role, RoleParseError};
pub use usage::Usage;

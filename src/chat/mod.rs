//! The conversational half of the console.
//!
//! - [`Conversation`]: the instructions and the ordered log of completed turns
//! - [`ChatCapability`]: the operations the console loop needs from a chat
//! - [`Chat`]: the capability backed by any [`Completions`](crate::Completions)

mod conversation;
mod session;

pub use conversation::Conversation;
pub use session::{Chat, ChatCapability};

//! Conversation transcript types
//!
//! The ordered message log shown to the user, and the message model it holds.

mod log;
mod message;

pub use log::ConversationLog;
pub use message::{Message, Role, SourceRef, CONNECTION_ERROR_TEXT};

//! Ordered conversation log

use super::Message;

/// Append-only message log, emptied only by an explicit clear.
///
/// `generation` counts clears. A resolution tagged with an older generation
/// belongs to a transcript the user has already thrown away.
#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
    generation: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop every message and start a new generation
    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

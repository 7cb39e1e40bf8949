//! Conversation state for one console session.

use crate::types::{Message, Role};

/// The instructions and message log of a single session.
///
/// Instructions are kept apart from the turns so that replacing them never
/// disturbs the log, and so they are always sent first.  The log only ever
/// grows, one complete turn (user message plus assistant reply) at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    instructions: Vec<Message>,
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs system instructions.
    ///
    /// With `replace` every earlier instruction is dropped; otherwise `text`
    /// is sent after the existing ones.
    pub fn set_instructions(&mut self, text: impl Into<String>, replace: bool) {
        if replace {
            self.instructions.clear();
        }
        self.instructions.push(Message::system(text));
    }

    /// The current system instructions, in send order.
    pub fn instructions(&self) -> &[Message] {
        &self.instructions
    }

    /// The completed turns, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the log, excluding instructions.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no turn has completed yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages to send for a new user turn: instructions, the log, then
    /// `pending`.
    pub fn request_messages(&self, pending: &Message) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(self.instructions.len() + self.messages.len() + 1);
        msgs.extend(self.instructions.iter().cloned());
        msgs.extend(self.messages.iter().cloned());
        msgs.push(pending.clone());
        msgs
    }

    /// Appends a completed turn.
    pub(crate) fn push_turn(&mut self, user: Message, assistant: Message) {
        debug_assert_eq!(user.role(), Role::User);
        debug_assert_eq!(assistant.role(), Role::Assistant);
        self.messages.push(user);
        self.messages.push(assistant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_empty() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert!(conversation.instructions().is_empty());
    }

    #[test]
    fn replace_instructions() {
        let mut conversation = Conversation::new();
        conversation.set_instructions("Be helpful", true);
        conversation.set_instructions("Be concise", true);
        assert_eq!(conversation.instructions(), &[Message::system("Be concise")]);
    }

    #[test]
    fn append_instructions() {
        let mut conversation = Conversation::new();
        conversation.set_instructions("Be helpful", true);
        conversation.set_instructions("Answer in English", false);
        assert_eq!(
            conversation.instructions(),
            &[
                Message::system("Be helpful"),
                Message::system("Answer in English")
            ]
        );
    }

    #[test]
    fn instructions_come_first() {
        let mut conversation = Conversation::new();
        conversation.push_turn(Message::user("Hello"), Message::assistant("Hi there!"));
        // Installed after a turn, still sent first.
        conversation.set_instructions("Be concise", true);

        let request = conversation.request_messages(&Message::user("And again"));
        assert_eq!(
            request,
            vec![
                Message::system("Be concise"),
                Message::user("Hello"),
                Message::assistant("Hi there!"),
                Message::user("And again"),
            ]
        );
        assert_eq!(conversation.len(), 2);
    }
}

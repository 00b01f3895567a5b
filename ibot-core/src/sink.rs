//! Message sink abstraction for posting and editing chat messages.
//!
//! [`MessageSink`] is the only way the pipeline talks to the transcript: insert a message and get its id
//! back, then edit that message in place. chat-store's `ChatStore` implements it.

use crate::types::{Sender, TEXT_MESSAGE_TYPE};
use std::sync::Arc;

/// Insert-then-edit access to an ordered chat transcript.
///
/// Both methods are synchronous and infallible: `update_message` with an unknown id is a no-op.
pub trait MessageSink: Send + Sync {
    /// Appends a message and returns the id assigned to it.
    fn insert_message(&self, content: &str, sender: Sender, message_type: &str) -> String;

    /// Replaces the content of the message with `id`, if it exists.
    fn update_message(&self, id: &str, content: &str);

    /// Appends a bot-authored text message; shorthand used for placeholders.
    fn insert_bot_message(&self, content: &str) -> String {
        self.insert_message(content, Sender::Bot, TEXT_MESSAGE_TYPE)
    }
}

impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    fn insert_message(&self, content: &str, sender: Sender, message_type: &str) -> String {
        (**self).insert_message(content, sender, message_type)
    }

    fn update_message(&self, id: &str, content: &str) {
        (**self).update_message(id, content)
    }
}

//! Core types: chat message, sender, incoming user turn, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display hint for plain text bubbles.
pub const TEXT_MESSAGE_TYPE: &str = "text";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single chat bubble. Only `content` and `timestamp` change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    /// Creation time, refreshed on every content update.
    pub timestamp: DateTime<Utc>,
    pub message_type: String,
}

impl Message {
    /// Builds a message stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        sender: Sender,
        message_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            message_type: message_type.into(),
        }
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Raw text submitted by the user for one turn, before it is recorded in the transcript.
#[derive(Debug, Clone)]
pub struct UserTurn {
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl UserTurn {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            received_at: Utc::now(),
        }
    }
}

/// Handler result for the chain. `Reply(text)` carries a summary so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _turn: &UserTurn) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the turn. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _turn: &UserTurn) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _turn: &UserTurn,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_as_str() {
        assert_eq!(Sender::Bot.as_str(), "bot");
        assert_eq!(Sender::User.as_str(), "user");
    }

    #[test]
    fn test_message_new_sets_fields() {
        let before = Utc::now();
        let msg = Message::new("m1", "hello", Sender::Bot, TEXT_MESSAGE_TYPE);
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.content, "hello");
        assert!(msg.is_from_bot());
        assert_eq!(msg.message_type, "text");
        assert!(msg.timestamp >= before);
    }
}

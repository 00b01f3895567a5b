//! # Chat Store
//!
//! In-memory, ordered transcript of the active chat session.
//!
//! [`ChatStore`] exposes three primitives:
//! - [`ChatStore::insert`] appends a message and returns its freshly generated id,
//! - [`ChatStore::update`] replaces a message's content in place by id (unknown ids are a no-op),
//! - [`ChatStore::replace_all`] swaps the whole sequence through a pure transformation.
//!
//! Observers read a snapshot with [`ChatStore::messages`] or follow every change through
//! [`ChatStore::subscribe`]. [`SessionRegistry`] keeps one store per chat session.
//!
//! ## Example
//!
//! ```rust
//! use chat_store::ChatStore;
//! use ibot_core::{MessageSink, Sender};
//!
//! let store = ChatStore::new();
//! let id = store.insert_bot_message("⚙️ Running LINT...");
//! store.update_message(&id, "✅ LINT completed.");
//!
//! let messages = store.messages();
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].sender, Sender::Bot);
//! assert_eq!(messages[0].content, "✅ LINT completed.");
//! ```
//!
//! ## Thread Safety
//!
//! The sequence lives inside a `tokio::sync::watch` channel: mutation is synchronous, takes the
//! channel's internal lock, and notifies subscribers without awaiting.

mod id;
mod session;

pub use id::next_message_id;
pub use session::{ChatSession, SessionRegistry, SessionSummary};

use chrono::Utc;
use ibot_core::{Message, MessageSink, Sender};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

const TITLE_MAX_CHARS: usize = 50;
const PREVIEW_MAX_CHARS: usize = 100;
const DEFAULT_TITLE: &str = "New Chat";

/// Ordered in-memory transcript for one chat session.
#[derive(Debug, Clone)]
pub struct ChatStore {
    messages: Arc<watch::Sender<Vec<Message>>>,
}

impl ChatStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_messages(Vec::new())
    }

    /// Creates a store seeded with existing history (e.g. a loaded session).
    pub fn with_messages(messages: Vec<Message>) -> Self {
        let (tx, _rx) = watch::channel(messages);
        Self {
            messages: Arc::new(tx),
        }
    }

    /// Appends a new message and returns its generated id.
    pub fn insert(&self, content: &str, sender: Sender, message_type: &str) -> String {
        let id = next_message_id(sender.as_str());
        let message = Message::new(id.clone(), content, sender, message_type);
        self.messages.send_modify(|messages| messages.push(message));
        debug!(id = %id, sender = sender.as_str(), "Message inserted");
        id
    }

    /// Replaces the content of the message with `id` and refreshes its timestamp.
    ///
    /// Position and all other fields are kept. An unknown id leaves the sequence untouched.
    pub fn update(&self, id: &str, content: &str) {
        let found = self.messages.send_if_modified(|messages| {
            match messages.iter_mut().find(|m| m.id == id) {
                Some(message) => {
                    message.content = content.to_string();
                    message.timestamp = Utc::now();
                    true
                }
                None => false,
            }
        });
        if found {
            debug!(id = %id, "Message updated");
        } else {
            warn!(id = %id, "Update for unknown message id ignored");
        }
    }

    /// Replaces the whole sequence with `updater(current)`.
    pub fn replace_all<F>(&self, updater: F)
    where
        F: FnOnce(Vec<Message>) -> Vec<Message>,
    {
        self.messages.send_modify(|messages| {
            let current = std::mem::take(messages);
            *messages = updater(current);
        });
        debug!(count = self.len(), "Message sequence replaced");
    }

    /// Snapshot of the current sequence, in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    /// Returns a copy of the message with `id`, if present.
    pub fn get(&self, id: &str) -> Option<Message> {
        self.messages.borrow().iter().find(|m| m.id == id).cloned()
    }

    /// Receiver that observes every insert, update and replacement.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }

    /// Returns the number of messages in the store.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Session title: the first user message cut to 50 characters, or "New Chat".
    pub fn title(&self) -> String {
        self.first_user_content()
            .map(|c| truncate_with_ellipsis(&c, TITLE_MAX_CHARS))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Session preview: the first user message cut to 100 characters, or empty.
    pub fn preview(&self) -> String {
        self.first_user_content()
            .map(|c| truncate_with_ellipsis(&c, PREVIEW_MAX_CHARS))
            .unwrap_or_default()
    }

    fn first_user_content(&self) -> Option<String> {
        self.messages
            .borrow()
            .iter()
            .find(|m| m.sender == Sender::User && !m.content.is_empty())
            .map(|m| m.content.clone())
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for ChatStore {
    fn insert_message(&self, content: &str, sender: Sender, message_type: &str) -> String {
        self.insert(content, sender, message_type)
    }

    fn update_message(&self, id: &str, content: &str) {
        self.update(id, content)
    }
}

/// Keeps at most `max_chars` characters, appending `...` when something was cut.
fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

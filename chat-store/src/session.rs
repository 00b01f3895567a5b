//! In-memory chat sessions: one [`ChatStore`] per conversation plus a pointer to the active one.
//!
//! Sessions live for the lifetime of the process. Only sessions that hold at least one message are
//! listed, newest first; the title and preview come from the session's first user message.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{next_message_id, ChatStore};

/// One conversation and its transcript. Clones share the transcript.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub store: ChatStore,
}

impl ChatSession {
    fn new() -> Self {
        Self {
            id: next_message_id("chat"),
            created_at: Utc::now(),
            store: ChatStore::new(),
        }
    }

    /// Time of the latest message, or creation time for an empty session.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.store
            .messages()
            .iter()
            .map(|m| m.timestamp)
            .max()
            .unwrap_or(self.created_at)
    }
}

/// Listing entry for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
    pub message_count: usize,
    pub is_current: bool,
}

#[derive(Debug)]
struct RegistryState {
    /// Newest first.
    sessions: Vec<ChatSession>,
    current: String,
}

impl RegistryState {
    fn start_session(&mut self) -> ChatSession {
        let session = ChatSession::new();
        self.current = session.id.clone();
        self.sessions.insert(0, session.clone());
        session
    }

    fn find(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }
}

/// Registry of the process's chat sessions. Always has a current session.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl SessionRegistry {
    /// Creates a registry with one empty, current session.
    pub fn new() -> Self {
        let mut state = RegistryState {
            sessions: Vec::new(),
            current: String::new(),
        };
        state.start_session();
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// The active session.
    pub async fn current(&self) -> ChatSession {
        let existing = {
            let state = self.state.read().await;
            state.find(&state.current).cloned()
        };
        match existing {
            Some(session) => session,
            None => self.state.write().await.start_session(),
        }
    }

    pub async fn current_id(&self) -> String {
        self.state.read().await.current.clone()
    }

    /// Starts an empty session and makes it current.
    pub async fn create_session(&self) -> ChatSession {
        let session = self.state.write().await.start_session();
        info!(session_id = %session.id, "Chat session created");
        session
    }

    /// Makes `id` current. Returns `None` and keeps the current session when `id` is unknown.
    pub async fn select(&self, id: &str) -> Option<ChatSession> {
        let mut state = self.state.write().await;
        let session = state.find(id)?.clone();
        state.current = session.id.clone();
        debug!(session_id = %id, "Chat session selected");
        Some(session)
    }

    /// Removes `id`. Deleting the current session starts a fresh one. Returns false for unknown ids.
    pub async fn delete(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != id);
        if state.sessions.len() == before {
            return false;
        }
        info!(session_id = %id, "Chat session deleted");
        if state.current == id {
            state.start_session();
        }
        true
    }

    /// Sessions holding at least one message, newest first.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let state = self.state.read().await;
        state
            .sessions
            .iter()
            .filter(|s| !s.store.is_empty())
            .map(|s| SessionSummary {
                id: s.id.clone(),
                title: s.store.title(),
                preview: s.store.preview(),
                timestamp: s.last_activity(),
                message_count: s.store.len(),
                is_current: s.id == state.current,
            })
            .collect()
    }

    /// Number of sessions, listed or not.
    pub async fn len(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

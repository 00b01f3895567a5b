//! # Issue client
//!
//! Defines the [`IssueApi`] trait for the three remote collaborators the pipeline drives
//! (fetch an issue by key, detect tools from its description, run one tool) and an HTTP
//! implementation, [`HttpIssueClient`].
//!
//! A response that explicitly reports failure (`"success": false` plus a reason) is a
//! [`RemoteOutcome::Failed`], not an error. Transport faults, unparseable bodies and missing
//! fields are [`ClientError`]s.

use async_trait::async_trait;

pub mod config;
mod error;
mod http;

pub use config::{ApiConfig, EnvApiConfig};
pub use error::{ClientError, Result};
pub use http::HttpIssueClient;

/// Reason shown when a failure response carries no `message`.
pub const UNKNOWN_FAILURE_REASON: &str = "Unknown error";

/// Result of a call whose response carries an explicit success flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome<T> {
    Success(T),
    /// Declared failure with the server-supplied reason.
    Failed(String),
}

impl<T> RemoteOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteOutcome::Success(_))
    }
}

/// Issue data the pipeline needs after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetails {
    pub key: String,
    pub description: String,
}

/// Remote collaborators consumed by the pipeline.
#[async_trait]
pub trait IssueApi: Send + Sync {
    /// Fetches the issue identified by `key`.
    async fn fetch_issue(&self, key: &str) -> Result<RemoteOutcome<IssueDetails>>;

    /// Returns the ordered tool names to run for `description`. Absent tools mean none.
    async fn detect_tools(&self, description: &str) -> Result<Vec<String>>;

    /// Runs `tool` against the issue.
    async fn run_tool(&self, tool: &str, key: &str, description: &str) -> Result<RemoteOutcome<()>>;
}

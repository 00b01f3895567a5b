//! Issue pipeline: one user text in, a sequence of placeholder messages out.
//!
//! Stages run strictly in order: extract key → fetch issue → detect tools → run each tool → complete.
//! Every stage that starts leaves its placeholder in a resting state (success, declared failure or
//! system error). Only the fetch placeholder receives the system error.

use ibot_core::MessageSink;
use issue_client::{IssueApi, RemoteOutcome};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::extract::extract_issue_key;
use crate::replies;

/// Final state of one tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Succeeded,
    /// Declared failure with the server reason.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub tool: String,
    pub status: ToolStatus,
}

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No issue key in the input; only the guidance message was posted.
    RejectedInput,
    /// The fetch call declared failure.
    FetchFailed { key: String, reason: String },
    /// Detection returned no tools.
    NoTools { key: String },
    /// Every detected tool was attempted, whatever its result.
    Completed { key: String, tools: Vec<ToolReport> },
    /// An undeclared failure ended the run early.
    SystemError { key: String, error: String },
}

impl PipelineOutcome {
    /// Name of the terminal state.
    pub fn terminal_state(&self) -> &'static str {
        match self {
            PipelineOutcome::RejectedInput => "rejected-input",
            PipelineOutcome::FetchFailed { .. } => "fetch-failed",
            PipelineOutcome::NoTools { .. } => "no-tools",
            PipelineOutcome::Completed { .. } => "completed",
            PipelineOutcome::SystemError { .. } => "system-error",
        }
    }

    /// One-line description for logs and handler replies.
    pub fn summary(&self) -> String {
        match self {
            PipelineOutcome::RejectedInput => "rejected-input: no issue key".to_string(),
            PipelineOutcome::FetchFailed { key, reason } => {
                format!("fetch-failed {}: {}", key, reason)
            }
            PipelineOutcome::NoTools { key } => format!("no-tools {}", key),
            PipelineOutcome::Completed { key, tools } => {
                let failed = tools
                    .iter()
                    .filter(|t| matches!(t.status, ToolStatus::Failed(_)))
                    .count();
                format!(
                    "completed {}: {} tool(s), {} failed",
                    key,
                    tools.len(),
                    failed
                )
            }
            PipelineOutcome::SystemError { key, error } => {
                format!("system-error {}: {}", key, error)
            }
        }
    }
}

/// Drives the remote calls for one user text and reports progress through a [`MessageSink`].
#[derive(Clone)]
pub struct IssuePipeline {
    api: Arc<dyn IssueApi>,
}

impl IssuePipeline {
    pub fn new(api: Arc<dyn IssueApi>) -> Self {
        Self { api }
    }

    /// **Entry point.** Runs the whole pipeline for `content`.
    ///
    /// Never fails: every fault ends in a message on `sink` and a matching [`PipelineOutcome`].
    #[instrument(skip(self, content, sink))]
    pub async fn run(&self, content: &str, sink: &dyn MessageSink) -> PipelineOutcome {
        let Some(key) = extract_issue_key(content) else {
            info!(content_len = content.len(), "step: no issue key, input rejected");
            sink.insert_bot_message(replies::MSG_NO_ISSUE_KEY);
            return PipelineOutcome::RejectedInput;
        };
        let key = key.to_string();
        info!(key = %key, "step: issue key extracted");

        let fetch_placeholder = sink.insert_bot_message(&replies::fetching(&key));

        match self.drive(&key, &fetch_placeholder, sink).await {
            Ok(outcome) => {
                info!(key = %key, state = outcome.terminal_state(), "step: pipeline finished");
                outcome
            }
            Err(e) => {
                let error = e.to_string();
                error!(key = %key, error = %error, "step: pipeline aborted by system error");
                sink.update_message(&fetch_placeholder, &replies::system_error(&error));
                PipelineOutcome::SystemError { key, error }
            }
        }
    }

    /// Fetch, detect and execute stages. `Err` is an undeclared failure for [`Self::run`] to report.
    async fn drive(
        &self,
        key: &str,
        fetch_placeholder: &str,
        sink: &dyn MessageSink,
    ) -> issue_client::Result<PipelineOutcome> {
        let issue = match self.api.fetch_issue(key).await? {
            RemoteOutcome::Success(issue) => issue,
            RemoteOutcome::Failed(reason) => {
                warn!(key = %key, reason = %reason, "step: fetch failed");
                sink.update_message(fetch_placeholder, &replies::fetch_failed(&reason));
                return Ok(PipelineOutcome::FetchFailed {
                    key: key.to_string(),
                    reason,
                });
            }
        };
        sink.update_message(fetch_placeholder, replies::MSG_DESCRIPTION_RETRIEVED);

        let detect_placeholder = sink.insert_bot_message(replies::MSG_ANALYZING);
        let tools = self.api.detect_tools(&issue.description).await?;
        if tools.is_empty() {
            info!(key = %key, "step: no tools detected");
            sink.update_message(&detect_placeholder, replies::MSG_NO_TOOLS);
            return Ok(PipelineOutcome::NoTools {
                key: key.to_string(),
            });
        }
        sink.update_message(&detect_placeholder, &replies::tools_detected(&tools));
        info!(key = %key, tools = ?tools, "step: executing tools");

        // One tool at a time; a declared failure only marks that tool's own message.
        let mut reports = Vec::with_capacity(tools.len());
        for tool in tools {
            let tool_placeholder = sink.insert_bot_message(&replies::tool_running(&tool));
            let status = match self.api.run_tool(&tool, key, &issue.description).await? {
                RemoteOutcome::Success(()) => {
                    sink.update_message(&tool_placeholder, &replies::tool_succeeded(&tool));
                    ToolStatus::Succeeded
                }
                RemoteOutcome::Failed(reason) => {
                    warn!(tool = %tool, reason = %reason, "step: tool failed");
                    sink.update_message(&tool_placeholder, &replies::tool_failed(&tool, &reason));
                    ToolStatus::Failed(reason)
                }
            };
            reports.push(ToolReport { tool, status });
        }

        sink.insert_bot_message(replies::MSG_COMPLETED);
        Ok(PipelineOutcome::Completed {
            key: key.to_string(),
            tools: reports,
        })
    }
}

//! # Issue pipeline
//!
//! Turns a chat message that mentions an issue key (e.g. `PROJ-123`) into a run of remote calls and
//! reports each step as a chat message that is posted once and then edited in place.
//!
//! - [`IssuePipeline`] drives the stages against an [`issue_client::IssueApi`] and an
//!   [`ibot_core::MessageSink`];
//! - [`TranscriptHandler`] and [`IssuePipelineHandler`] plug it into a handler chain.

mod extract;
mod handler;
mod pipeline;
pub mod replies;

pub use extract::extract_issue_key;
pub use handler::{IssuePipelineHandler, TranscriptHandler};
pub use pipeline::{IssuePipeline, PipelineOutcome, ToolReport, ToolStatus};

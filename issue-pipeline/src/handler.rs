//! Handler-chain adapters: record the user's turn, then run the issue pipeline for it.

use async_trait::async_trait;
use ibot_core::{Handler, HandlerResponse, MessageSink, Result, Sender, UserTurn, TEXT_MESSAGE_TYPE};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::pipeline::IssuePipeline;

/// Records each non-blank user turn in the transcript before later handlers run.
///
/// Blank input stops the chain without touching the transcript.
#[derive(Clone)]
pub struct TranscriptHandler {
    sink: Arc<dyn MessageSink>,
}

impl TranscriptHandler {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Handler for TranscriptHandler {
    async fn before(&self, turn: &UserTurn) -> Result<bool> {
        if turn.content.trim().is_empty() {
            debug!("Blank user turn ignored");
            return Ok(false);
        }
        let id = self
            .sink
            .insert_message(&turn.content, Sender::User, TEXT_MESSAGE_TYPE);
        debug!(id = %id, "User turn recorded");
        Ok(true)
    }
}

/// Runs [`IssuePipeline`] for the turn and replies with the outcome summary.
#[derive(Clone)]
pub struct IssuePipelineHandler {
    pipeline: IssuePipeline,
    sink: Arc<dyn MessageSink>,
}

impl IssuePipelineHandler {
    pub fn new(pipeline: IssuePipeline, sink: Arc<dyn MessageSink>) -> Self {
        Self { pipeline, sink }
    }
}

#[async_trait]
impl Handler for IssuePipelineHandler {
    #[instrument(skip(self, turn))]
    async fn handle(&self, turn: &UserTurn) -> Result<HandlerResponse> {
        let outcome = self.pipeline.run(&turn.content, self.sink.as_ref()).await;
        info!(state = outcome.terminal_state(), "step: issue pipeline handler done");
        Ok(HandlerResponse::Reply(outcome.summary()))
    }
}

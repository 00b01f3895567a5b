//! Assembly: the session registry, the HTTP issue client and the handler chain that ties them together.

use anyhow::{Context, Result};
use chat_store::{ChatStore, SessionRegistry};
use handler_chain::HandlerChain;
use ibot_core::{HandlerError, HandlerResponse, Message, MessageSink, UserTurn};
use issue_client::{HttpIssueClient, IssueApi};
use issue_pipeline::{IssuePipeline, IssuePipelineHandler, TranscriptHandler};
use std::sync::Arc;
use tracing::info;

use crate::cli::BotConfig;

/// Chat bot wired to the issue pipeline. Each turn lands in the current session.
#[derive(Clone)]
pub struct IssueBot {
    pipeline: IssuePipeline,
    sessions: SessionRegistry,
}

impl IssueBot {
    /// Builds the bot around any [`IssueApi`] (HTTP in production, fakes in tests).
    pub fn new(api: Arc<dyn IssueApi>) -> Self {
        Self {
            pipeline: IssuePipeline::new(api),
            sessions: SessionRegistry::new(),
        }
    }

    /// Builds the bot with an [`HttpIssueClient`] from config.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let client = HttpIssueClient::from_config(&config.api)
            .context("Create HTTP issue client (check ISSUE_API_BASE_URL)")?;
        info!(base_url = %client.base_url(), "Issue client ready");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Transcript of the current session.
    pub async fn store(&self) -> ChatStore {
        self.sessions.current().await.store
    }

    /// Processes one user message through the handler chain of the current session.
    pub async fn process(&self, text: &str) -> ibot_core::Result<HandlerResponse> {
        if text.trim().is_empty() {
            return Err(HandlerError::EmptyContent.into());
        }
        let chain = self.chain_for(self.store().await);
        chain.handle(&UserTurn::new(text)).await
    }

    /// Current session's transcript, one rendered line per message.
    pub async fn transcript(&self) -> String {
        self.store()
            .await
            .messages()
            .iter()
            .map(render_message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn chain_for(&self, store: ChatStore) -> HandlerChain {
        let sink: Arc<dyn MessageSink> = Arc::new(store);
        HandlerChain::new()
            .add_handler(Arc::new(TranscriptHandler::new(sink.clone())))
            .add_handler(Arc::new(IssuePipelineHandler::new(
                self.pipeline.clone(),
                sink,
            )))
    }
}

/// `[HH:MM:SS] sender: content`
pub fn render_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M:%S"),
        message.sender.as_str(),
        message.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibot_core::{Sender, TEXT_MESSAGE_TYPE};

    #[test]
    fn test_render_message() {
        let message = Message::new("id", "✅ LINT completed.", Sender::Bot, TEXT_MESSAGE_TYPE);
        let line = render_message(&message);
        assert!(line.starts_with('['));
        assert!(line.ends_with("] bot: ✅ LINT completed."));
    }

    #[tokio::test]
    async fn test_process_rejects_blank_text() {
        let client = HttpIssueClient::new("http://localhost:3000").unwrap();
        let bot = IssueBot::new(Arc::new(client));

        let err = bot.process("  ").await.unwrap_err();

        assert!(matches!(
            err,
            ibot_core::BotError::Handler(HandlerError::EmptyContent)
        ));
        assert!(bot.store().await.is_empty());
    }

    #[tokio::test]
    async fn test_process_writes_into_current_session() {
        let client = HttpIssueClient::new("http://localhost:3000").unwrap();
        let bot = IssueBot::new(Arc::new(client));
        let first = bot.sessions().current().await;

        bot.process("hello").await.unwrap();
        let second = bot.sessions().create_session().await;
        bot.process("hi again").await.unwrap();

        assert_eq!(first.store.len(), 2);
        assert_eq!(second.store.len(), 2);
        assert_eq!(first.store.title(), "hello");
        assert_eq!(bot.store().await.title(), "hi again");
        assert!(bot.transcript().await.contains("user: hi again"));
    }
}

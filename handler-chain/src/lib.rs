//! # Handler chain
//!
//! Runs a sequence of handlers for each user turn: every handler's `before` in order (any `false`
//! stops the chain), then `handle` in order until the first Stop or Reply, then every `after` in
//! reverse order with the final response.

use ibot_core::{Handler, HandlerResponse, Result, UserTurn};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered chain of handlers.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop/Reply ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before, handle and after phases. Returns the first Stop or Reply, or Continue.
    #[instrument(skip(self, turn))]
    pub async fn handle(&self, turn: &UserTurn) -> Result<HandlerResponse> {
        let mut final_response = HandlerResponse::Continue;

        info!(
            content_len = turn.content.len(),
            handlers = self.handlers.len(),
            "step: handler_chain started"
        );

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let should_continue = handler.before(turn).await?;
            if !should_continue {
                info!(
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
            debug!(handler = %handler_name, "step: handler before done");
        }

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            info!(handler = %handler_name, "step: handler processing");
            let response = handler.handle(turn).await?;
            let (response_type, reply_len) = match &response {
                HandlerResponse::Continue => ("Continue", None),
                HandlerResponse::Stop => ("Stop", None),
                HandlerResponse::Ignore => ("Ignore", None),
                HandlerResponse::Reply(s) => ("Reply", Some(s.len())),
            };
            info!(
                handler = %handler_name,
                response_type = %response_type,
                reply_len = ?reply_len,
                "step: handler done"
            );

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(turn, &final_response).await?;
        }

        info!(response = ?final_response, "step: handler_chain finished");

        Ok(final_response)
    }
}

// Unit/integration tests live in tests/handler_chain_test.rs

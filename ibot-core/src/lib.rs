//! # ibot-core
//!
//! Core types and traits for the issue bot: [`Message`], [`Sender`], the [`MessageSink`] seam used to
//! post and edit chat messages, the [`Handler`] trait run by handler-chain, and tracing initialization.
//! Transport-agnostic; used by chat-store, issue-pipeline and ibot-cli.

pub mod error;
pub mod logger;
pub mod sink;
pub mod types;

pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use sink::MessageSink;
pub use types::{Handler, HandlerResponse, Message, Sender, UserTurn, TEXT_MESSAGE_TYPE};

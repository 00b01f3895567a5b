//! # ibot-cli
//!
//! CLI foundation: argument parsing, config loading, bot assembly and the interactive chat loop.

pub mod app;
pub mod chat;
pub mod cli;

pub use app::{render_message, IssueBot};
pub use chat::{run_chat, ChatCommand, CHAT_HELP};
pub use cli::{BotConfig, Cli, Commands};

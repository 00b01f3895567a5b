//! issuebot CLI: run the issue pipeline for one message, or chat interactively with in-memory
//! sessions. Config from env.

use anyhow::{Context, Result};
use clap::Parser;
use ibot_cli::{run_chat, BotConfig, Cli, Commands, IssueBot, CHAT_HELP};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BotConfig::load().context("Load config from .env / environment")?;
    ibot_core::init_tracing(&config.log_file)?;

    let bot = IssueBot::from_config(&config)?;

    match cli.command {
        Commands::Run { text } => handle_run(&bot, &text).await,
        Commands::Chat => handle_chat(&bot).await,
    }
}

/// Processes `text` once and prints the final transcript.
async fn handle_run(bot: &IssueBot, text: &str) -> Result<()> {
    let response = bot.process(text).await?;
    info!(response = ?response, "Run finished");
    println!("{}", bot.transcript().await);
    Ok(())
}

/// Reads stdin until EOF or `/quit`, printing transcript changes as they happen.
async fn handle_chat(bot: &IssueBot) -> Result<()> {
    println!("Type a message mentioning an issue key (e.g. PROJ-123). {}", CHAT_HELP);
    let input = BufReader::new(tokio::io::stdin());
    run_chat(bot, input, Arc::new(Mutex::new(std::io::stdout()))).await
}

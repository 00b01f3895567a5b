//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use issue_client::EnvApiConfig;
use std::env;

#[derive(Parser, Debug)]
#[command(name = "issuebot")]
#[command(about = "Issue bot CLI: run the issue pipeline for one message or an interactive chat", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Process one message and print the resulting transcript.
    Run {
        #[arg(short, long)]
        text: String,
    },
    /// Read messages from stdin and print transcript changes as they happen; `/new`, `/sessions`,
    /// `/switch <id>` and `/delete <id>` manage in-memory sessions.
    Chat,
}

/// Bot config: collaborator API settings plus log file.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub api: EnvApiConfig,
    /// LOG_FILE
    pub log_file: String,
}

impl BotConfig {
    /// Load from environment variables (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn load() -> Result<Self> {
        let api = EnvApiConfig::from_env()?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/issuebot.log".to_string());
        Ok(Self { api, log_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["issuebot", "run", "--text", "Please look at PROJ-123"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Run {
                text: "Please look at PROJ-123".to_string()
            }
        );
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::try_parse_from(["issuebot", "chat"]).unwrap();
        assert_eq!(cli.command, Commands::Chat);
    }

    #[test]
    fn test_run_requires_text() {
        assert!(Cli::try_parse_from(["issuebot", "run"]).is_err());
    }

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        env::remove_var("LOG_FILE");
        env::remove_var("ISSUE_API_BASE_URL");
        env::remove_var("ISSUE_API_TIMEOUT_SECS");

        let config = BotConfig::load().unwrap();

        assert_eq!(config.log_file, "logs/issuebot.log");
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_load_config_custom_log_file() {
        env::set_var("LOG_FILE", "/tmp/ibot.log");
        env::remove_var("ISSUE_API_BASE_URL");
        env::remove_var("ISSUE_API_TIMEOUT_SECS");

        let config = BotConfig::load().unwrap();
        assert_eq!(config.log_file, "/tmp/ibot.log");

        env::remove_var("LOG_FILE");
    }
}

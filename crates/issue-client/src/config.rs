//! API configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the issue collaborator endpoints.
pub trait ApiConfig: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
}

/// API config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvApiConfig {
    /// ISSUE_API_BASE_URL
    pub base_url: String,
    /// ISSUE_API_TIMEOUT_SECS
    pub timeout_secs: u64,
}

impl ApiConfig for EnvApiConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EnvApiConfig {
    /// Load from environment variables and validate.
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("ISSUE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match env::var("ISSUE_API_TIMEOUT_SECS") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("ISSUE_API_TIMEOUT_SECS is not a number: {}", s))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let config = Self {
            base_url,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Base URL must parse and timeout must be positive.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.base_url).is_err() {
            anyhow::bail!("ISSUE_API_BASE_URL is not a valid URL: {}", self.base_url);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("ISSUE_API_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }
}

//! Logging setup for the `issuebot` binary. Pipeline steps log as `step: ...` events; this module
//! decides where they end up.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Installs the process-wide subscriber used by the CLI.
///
/// Every event goes to the terminal and to `log_file_path`, so a chat session can be replayed from
/// the log after the fact. The file is appended to and its directory is created on first use.
/// `RUST_LOG` picks the level (`info` when unset); it is read here, after the CLI loaded `.env`.
/// Fails when a subscriber is already installed.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = io::stdout.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/issuebot.log");
        // A second init in the same process fails; only the file side effect matters here.
        let _ = init_tracing(path.to_str().unwrap());
        assert!(path.exists());
    }
}

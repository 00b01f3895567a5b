//! Interactive chat: one line per turn, slash commands for sessions, live transcript output.

use anyhow::Result;
use chat_store::ChatStore;
use ibot_core::Message;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::app::{render_message, IssueBot};

pub const CHAT_HELP: &str =
    "Commands: /new, /sessions, /switch <id>, /delete <id>, /quit. Anything else is sent to the bot.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Message(String),
    New,
    Sessions,
    Switch(String),
    Delete(String),
    Quit,
    Empty,
    /// Unknown command or missing argument.
    Help,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Empty;
        }
        if !line.starts_with('/') {
            return ChatCommand::Message(line.to_string());
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);
        match (command, arg) {
            ("/quit", _) => ChatCommand::Quit,
            ("/new", _) => ChatCommand::New,
            ("/sessions", _) => ChatCommand::Sessions,
            ("/switch", Some(id)) => ChatCommand::Switch(id),
            ("/delete", Some(id)) => ChatCommand::Delete(id),
            _ => ChatCommand::Help,
        }
    }
}

/// Runs the chat loop until EOF or `/quit`, writing transcript changes and command output to `out`.
///
/// Returns only after the last change of the last turn has been written.
pub async fn run_chat<R, W>(bot: &IssueBot, input: R, out: Arc<Mutex<W>>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut watcher = TranscriptWatcher::spawn(&bot.store().await, out.clone());
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match ChatCommand::parse(&line) {
            ChatCommand::Quit => break,
            ChatCommand::Empty => {}
            ChatCommand::Help => say(&out, CHAT_HELP).await,
            ChatCommand::Message(text) => {
                if let Err(e) = bot.process(&text).await {
                    error!(error = %e, "Failed to process message");
                }
            }
            ChatCommand::New => {
                watcher.stop().await;
                let session = bot.sessions().create_session().await;
                say(&out, &format!("Started session {}", session.id)).await;
                watcher = TranscriptWatcher::spawn(&session.store, out.clone());
            }
            ChatCommand::Switch(id) => match bot.sessions().select(&id).await {
                Some(session) => {
                    watcher.stop().await;
                    say(&out, &format!("Switched to session {}", session.id)).await;
                    watcher = TranscriptWatcher::spawn(&session.store, out.clone());
                }
                None => say(&out, &format!("Unknown session: {}", id)).await,
            },
            ChatCommand::Delete(id) => {
                let was_current = bot.sessions().current_id().await == id;
                if !bot.sessions().delete(&id).await {
                    say(&out, &format!("Unknown session: {}", id)).await;
                } else if was_current {
                    watcher.stop().await;
                    let session = bot.sessions().current().await;
                    say(
                        &out,
                        &format!("Deleted session {}; started session {}", id, session.id),
                    )
                    .await;
                    watcher = TranscriptWatcher::spawn(&session.store, out.clone());
                } else {
                    say(&out, &format!("Deleted session {}", id)).await;
                }
            }
            ChatCommand::Sessions => {
                let sessions = bot.sessions().list().await;
                if sessions.is_empty() {
                    say(&out, "No sessions yet.").await;
                }
                for s in sessions {
                    let marker = if s.is_current { "*" } else { " " };
                    say(
                        &out,
                        &format!(
                            "{} {} [{}] {} ({} messages)",
                            marker,
                            s.id,
                            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            s.title,
                            s.message_count
                        ),
                    )
                    .await;
                }
            }
        }
    }

    watcher.stop().await;
    Ok(())
}

async fn say<W: Write>(out: &Mutex<W>, line: &str) {
    let mut out = out.lock().await;
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!(error = %e, "Failed to write chat output");
    }
}

/// Background task printing one store's inserts and edits.
struct TranscriptWatcher {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TranscriptWatcher {
    fn spawn<W>(store: &ChatStore, out: Arc<Mutex<W>>) -> Self
    where
        W: Write + Send + 'static,
    {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(print_changes(store.subscribe(), out, shutdown_rx));
        Self { shutdown, handle }
    }

    /// Signals the task and waits until it has written the store's final state.
    async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Transcript watcher ended abnormally");
        }
    }
}

async fn print_changes<W: Write>(
    mut rx: watch::Receiver<Vec<Message>>,
    out: Arc<Mutex<W>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut printed: HashMap<String, String> = HashMap::new();
    print_pass(&mut rx, &mut printed, &out).await;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_pass(&mut rx, &mut printed, &out).await;
            }
            _ = &mut shutdown => break,
        }
    }
    // Changes made right before shutdown may not have been observed yet.
    print_pass(&mut rx, &mut printed, &out).await;
}

/// Writes each new message, and each message whose content changed since it was last written.
async fn print_pass<W: Write>(
    rx: &mut watch::Receiver<Vec<Message>>,
    printed: &mut HashMap<String, String>,
    out: &Mutex<W>,
) {
    let messages = rx.borrow_and_update().clone();
    let mut lines = Vec::new();
    for message in &messages {
        match printed.get(&message.id) {
            Some(content) if *content == message.content => continue,
            Some(_) => lines.push(format!("{} (edited)", render_message(message))),
            None => lines.push(render_message(message)),
        }
        printed.insert(message.id.clone(), message.content.clone());
    }
    if lines.is_empty() {
        return;
    }
    say(out, &lines.join("\n")).await;
}

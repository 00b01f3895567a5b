//! Test doubles for pipeline tests.
//!
//! [`FakeIssueApi`] is a scripted [`issue_client::IssueApi`]: it records every call as a string
//! (`fetch:KEY`, `detect:DESC`, `run:TOOL:KEY`) and tracks how many tool runs were in flight at once.
//! [`RecordingSink`] is a [`MessageSink`] that keeps the raw insert/update sequence.

#![allow(dead_code)]

use async_trait::async_trait;
use ibot_core::{MessageSink, Sender};
use issue_client::{ClientError, IssueApi, IssueDetails, RemoteOutcome, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Reply(T),
    Declared(String),
    Transport,
}

fn transport_error() -> ClientError {
    ClientError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    }
}

/// Text the pipeline shows for [`transport_error`].
pub const TRANSPORT_ERROR_TEXT: &str = "⚠️ System error: Unexpected HTTP status 502: bad gateway";

pub struct FakeIssueApi {
    fetch: Scripted<String>,
    detect: Option<Vec<String>>,
    tools: HashMap<String, Scripted<()>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeIssueApi {
    /// Fetch succeeds with description `"d"`; detection returns no tools; every tool succeeds.
    pub fn new() -> Self {
        Self {
            fetch: Scripted::Reply("d".to_string()),
            detect: Some(Vec::new()),
            tools: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_fetch(mut self, fetch: Scripted<String>) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.detect = Some(tools.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Detection call fails with a transport error.
    pub fn with_detect_error(mut self) -> Self {
        self.detect = None;
        self
    }

    pub fn with_tool(mut self, tool: &str, result: Scripted<()>) -> Self {
        self.tools.insert(tool.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IssueApi for FakeIssueApi {
    async fn fetch_issue(&self, key: &str) -> Result<RemoteOutcome<IssueDetails>> {
        self.record(format!("fetch:{}", key));
        tokio::task::yield_now().await;
        match &self.fetch {
            Scripted::Reply(description) => Ok(RemoteOutcome::Success(IssueDetails {
                key: key.to_string(),
                description: description.clone(),
            })),
            Scripted::Declared(reason) => Ok(RemoteOutcome::Failed(reason.clone())),
            Scripted::Transport => Err(transport_error()),
        }
    }

    async fn detect_tools(&self, description: &str) -> Result<Vec<String>> {
        self.record(format!("detect:{}", description));
        tokio::task::yield_now().await;
        self.detect.clone().ok_or_else(transport_error)
    }

    async fn run_tool(&self, tool: &str, key: &str, _description: &str) -> Result<RemoteOutcome<()>> {
        self.record(format!("run:{}:{}", tool, key));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.tools.get(tool).cloned().unwrap_or(Scripted::Reply(())) {
            Scripted::Reply(()) => Ok(RemoteOutcome::Success(())),
            Scripted::Declared(reason) => Ok(RemoteOutcome::Failed(reason)),
            Scripted::Transport => Err(transport_error()),
        }
    }
}

/// One call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Insert { id: String, content: String },
    Update { id: String, content: String },
}

/// Hands out ids `m1`, `m2`, ... and records every insert and update in call order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn insert_message(&self, content: &str, _sender: Sender, _message_type: &str) -> String {
        let mut events = self.events.lock().unwrap();
        let inserted = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Insert { .. }))
            .count();
        let id = format!("m{}", inserted + 1);
        events.push(SinkEvent::Insert {
            id: id.clone(),
            content: content.to_string(),
        });
        id
    }

    fn update_message(&self, id: &str, content: &str) {
        self.events.lock().unwrap().push(SinkEvent::Update {
            id: id.to_string(),
            content: content.to_string(),
        });
    }
}

//! HTTP implementation of [`IssueApi`]: JSON POST requests to the collaborator endpoints.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::{IssueApi, IssueDetails, RemoteOutcome, UNKNOWN_FAILURE_REASON};

/// Max body characters kept in a [`ClientError::Status`].
const ERROR_BODY_PREVIEW_LEN: usize = 200;

/// reqwest-based [`IssueApi`].
///
/// Endpoints, relative to the base URL:
/// - `POST /api/jira/fetch` with `{"key"}`
/// - `POST /api/llm/detect-tools` with `{"description"}`
/// - `POST /api/tool/<lower-cased tool>` with `{"key", "description"}`
#[derive(Debug, Clone)]
pub struct HttpIssueClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct FetchRequest<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct RunToolRequest<'a> {
    key: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<FetchData>,
}

#[derive(Debug, Deserialize)]
struct FetchData {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: Option<DetectData>,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    #[serde(default)]
    tools: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RunToolResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

impl HttpIssueClient {
    /// Creates a client for `base_url` with reqwest defaults.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client from config (base URL and request timeout).
    pub fn from_config(config: &dyn ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(client, config.base_url())
    }

    /// Uses a caller-built reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POSTs `body` as JSON and decodes the response body, whatever the status.
    ///
    /// A body that does not decode becomes [`ClientError::Status`] on a non-2xx status and
    /// [`ClientError::Decode`] otherwise.
    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url = %url, "POST");
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(url = %url, status = status.as_u16(), body_len = text.len(), "Response received");

        match serde_json::from_str::<R>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                warn!(url = %url, status = status.as_u16(), "Non-success status with undecodable body");
                Err(ClientError::Status {
                    status: status.as_u16(),
                    body: text.chars().take(ERROR_BODY_PREVIEW_LEN).collect(),
                })
            }
            Err(e) => Err(ClientError::Decode(e)),
        }
    }
}

fn failure_reason(message: Option<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_FAILURE_REASON.to_string())
}

#[async_trait]
impl IssueApi for HttpIssueClient {
    #[instrument(skip(self))]
    async fn fetch_issue(&self, key: &str) -> Result<RemoteOutcome<IssueDetails>> {
        info!(key = %key, "step: fetch issue request");
        let url = self.endpoint(&["api", "jira", "fetch"])?;
        let response: FetchResponse = self.post_json(url, &FetchRequest { key }).await?;

        if !response.success {
            let reason = failure_reason(response.message);
            info!(key = %key, reason = %reason, "step: fetch issue declared failure");
            return Ok(RemoteOutcome::Failed(reason));
        }

        let description = response
            .data
            .ok_or(ClientError::MissingField("data"))?
            .description
            .ok_or(ClientError::MissingField("data.description"))?;
        info!(key = %key, description_len = description.len(), "step: fetch issue done");
        Ok(RemoteOutcome::Success(IssueDetails {
            key: key.to_string(),
            description,
        }))
    }

    #[instrument(skip(self, description))]
    async fn detect_tools(&self, description: &str) -> Result<Vec<String>> {
        info!(description_len = description.len(), "step: detect tools request");
        let url = self.endpoint(&["api", "llm", "detect-tools"])?;
        let response: DetectResponse = self.post_json(url, &DetectRequest { description }).await?;
        let tools = response
            .data
            .and_then(|d| d.tools)
            .unwrap_or_default();
        info!(tools = ?tools, "step: detect tools done");
        Ok(tools)
    }

    #[instrument(skip(self, description))]
    async fn run_tool(&self, tool: &str, key: &str, description: &str) -> Result<RemoteOutcome<()>> {
        let tool_segment = tool.to_lowercase();
        info!(tool = %tool, key = %key, "step: run tool request");
        let url = self.endpoint(&["api", "tool", tool_segment.as_str()])?;
        let response: RunToolResponse = self
            .post_json(url, &RunToolRequest { key, description })
            .await?;

        if response.success {
            info!(tool = %tool, "step: run tool done");
            Ok(RemoteOutcome::Success(()))
        } else {
            let reason = failure_reason(response.message);
            info!(tool = %tool, reason = %reason, "step: run tool declared failure");
            Ok(RemoteOutcome::Failed(reason))
        }
    }
}

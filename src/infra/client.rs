use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planners::AgentResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server rejected the request (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Replay file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answer to one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAction {
    pub run: String,
    pub action: AgentResponse,
}

/// Body of `PUT /act/{env}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActRequest {
    pub agent: String,
    pub pwd: String,
    pub actions: Vec<RunAction>,
    pub single_request: bool,
}

/// A run waiting for an action. The percept is decoded by the caller so that
/// one bad percept does not spoil the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub run: String,
    pub percept: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActResponse {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(rename = "action-requests", default)]
    pub action_requests: Vec<ActionRequest>,
}

/// Outcome of one exchange with the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    Ok(ActResponse),
    /// 503, worth retrying with the same actions.
    Busy,
    /// Any other status; retrying does not help.
    Rejected { status: u16, body: String },
}

/// Something that accepts actions and hands out percepts.
#[allow(async_fn_in_trait)]
pub trait ActServer {
    async fn act(&mut self, request: &ActRequest) -> Result<ServerReply, ClientError>;
}

/// HTTP connection to the environment server.
pub struct HttpConnection {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpConnection {
    pub fn new(endpoint: String) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(HttpConnection { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ActServer for HttpConnection {
    async fn act(&mut self, request: &ActRequest) -> Result<ServerReply, ClientError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            actions = request.actions.len(),
            "Sending request"
        );

        let response = self.client.put(&self.endpoint).json(request).send().await?;

        match response.status() {
            StatusCode::OK => Ok(ServerReply::Ok(response.json().await?)),
            StatusCode::SERVICE_UNAVAILABLE => Ok(ServerReply::Busy),
            status => Ok(ServerReply::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

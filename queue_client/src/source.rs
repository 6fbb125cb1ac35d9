use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::protocol::{Queue, QueueListResponse};

// Errors produced while fetching queue state.
#[derive(Debug)]
pub enum FetchError {
    Transport(String),
    Upstream { status: u16 },
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(err) => write!(f, "queue transport error: {err}"),
            FetchError::Upstream { status } => write!(f, "queue upstream error {status}"),
            FetchError::Decode(err) => write!(f, "queue response decode error: {err}"),
        }
    }
}

impl std::error::Error for FetchError {}

// The feed depends on this trait, not the concrete HTTP client.
#[async_trait]
pub trait QueueSource: Send + Sync {
    async fn fetch_queues(&self) -> Result<Vec<Queue>, FetchError>;
}

// Thin reqwest client for the booking server's queue API.
#[derive(Clone)]
pub struct HttpQueueSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpQueueSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl QueueSource for HttpQueueSource {
    async fn fetch_queues(&self) -> Result<Vec<Queue>, FetchError> {
        let url = format!("{}/api/queue", self.base_url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let envelope = response
            .json::<QueueListResponse>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;

        // The server keeps this path 200-only; a false success flag would
        // mean a contract change upstream.
        if !envelope.success {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(envelope.data)
    }
}

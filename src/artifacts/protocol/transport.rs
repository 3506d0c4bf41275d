use crate::artifacts::protocol::UPLOAD_PACK_RESULT_TYPE;
use crate::config::Config;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

/// Byte-level request/response collaborator
///
/// Implementations only move bytes. A non-success answer from the remote
/// is an `Error::Transport`.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Bytes>;

    fn post(&self, url: &str, content_type: &str, body: Bytes) -> Result<Bytes>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpTransport { client })
    }

    fn into_body(url: &str, response: Response) -> Result<Bytes> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{url} answered {status}")));
        }

        let body = response
            .bytes()
            .map_err(|e| Error::Transport(format!("failed to read body of {url}: {e}")))?;
        debug!(url, %status, bytes = body.len(), "received response");

        Ok(body)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Transport(format!("GET {url}: {e}")))?;

        Self::into_body(url, response)
    }

    fn post(&self, url: &str, content_type: &str, body: Bytes) -> Result<Bytes> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, UPLOAD_PACK_RESULT_TYPE)
            .body(body.to_vec())
            .send()
            .map_err(|e| Error::Transport(format!("POST {url}: {e}")))?;

        Self::into_body(url, response)
    }
}

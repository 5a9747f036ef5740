//! Outbound REST calls to the inference server.

use crate::Result;
use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Sends JSON payloads with a single POST and hands back the raw reply body.
///
/// No retries are attempted. A deadline, when set, applies to the whole
/// exchange including reading the body.
#[derive(Debug, Clone, Default)]
pub struct RestBridge {
    client: reqwest::Client,
}

impl RestBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// POSTs `payload` as JSON to `url` and returns the complete response body.
    ///
    /// The body is returned whatever the upstream status code; only transport
    /// failures (bad URL, refused connection, timeout, truncated read) are
    /// errors.
    pub async fn send_post_request<T>(&self, url: &str, payload: &T) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        debug!("Sending POST request to {}", url);

        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Inference server at {} answered with status {}", url, status);
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);

        Ok(body)
    }

    /// GETs `url` and returns the complete body. Unlike POST, a non-success
    /// status is an error here since there is no reply shape to fall back on.
    pub async fn send_get_request(&self, url: &str) -> Result<Bytes> {
        debug!("Sending GET request to {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;

        Ok(response.bytes().await?)
    }
}

//! Page transport for the catalog client.
//!
//! The client only needs "GET this URL, optionally with a bearer token, and
//! give me the body of a success response". `HttpTransport` does that with
//! `reqwest`; tests substitute a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use tagsync_core::{TagsyncError, TagsyncResult};

#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Fetch `url`.
    ///
    /// MUST:
    /// - attach `Authorization: Bearer <token>` when `bearer` is set
    /// - fail with a transport error carrying the status for non-2xx replies
    /// - fail with a transport error for connection and body-read failures
    async fn get(&self, url: &Url, bearer: Option<&str>) -> TagsyncResult<Vec<u8>>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> TagsyncResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TagsyncError::config(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn get(&self, url: &Url, bearer: Option<&str>) -> TagsyncResult<Vec<u8>> {
        let mut req = self.client.get(url.as_str());
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TagsyncError::transport(url.as_str(), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TagsyncError::http_status(url.as_str(), status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TagsyncError::transport(url.as_str(), format!("failed to read body: {e}")))?;
        Ok(body.to_vec())
    }
}

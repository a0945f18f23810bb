// fastbin-net/src/http.rs
use std::time::Duration;

use fastbin_common::error::{FastbinError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use crate::fetch::StagingSink;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = concat!("fastbin/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP(S) GET of the URL.
#[derive(Debug, Clone)]
pub struct DirectSource {
    client: Client,
}

impl DirectSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    pub async fn download(&self, url: &Url, sink: StagingSink<'_>) -> Result<u64> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            FastbinError::network(url.as_str(), e)
        })?;

        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);
        if !status.is_success() {
            error!("HTTP error {} for URL {}", status, url);
            return Err(FastbinError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // content_length() is None for chunked or compressed bodies.
        let total = response.content_length();
        debug!("Expected body size for {}: {:?}", url, total);
        sink.write_stream(response.bytes_stream(), total).await
    }
}

fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FastbinError::Config(format!("Failed to build HTTP client: {e}")))
}

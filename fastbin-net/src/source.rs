// fastbin-net/src/source.rs
use fastbin_common::error::{FastbinError, Result};
use url::Url;

use crate::fetch::StagingSink;
use crate::http::DirectSource;
use crate::local::LocalSource;

/// Retrieval backends, chosen by inspecting the URL.
#[derive(Debug, Clone)]
pub enum Source {
    Direct(DirectSource),
    Local(LocalSource),
}

impl Source {
    pub fn for_url(url: &Url) -> Result<Self> {
        match url.scheme() {
            "http" | "https" => Ok(Source::Direct(DirectSource::new()?)),
            "file" => Ok(Source::Local(LocalSource)),
            other => Err(FastbinError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Direct(_) => "direct",
            Source::Local(_) => "local",
        }
    }

    /// Streams the body behind `url` into the sink and returns the byte count.
    pub async fn download(&self, url: &Url, sink: StagingSink<'_>) -> Result<u64> {
        match self {
            Source::Direct(source) => source.download(url, sink).await,
            Source::Local(source) => source.download(url, sink).await,
        }
    }
}

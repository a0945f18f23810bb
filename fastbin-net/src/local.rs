// fastbin-net/src/local.rs
use fastbin_common::error::{fs_context, FastbinError, Result};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;
use url::Url;

use crate::fetch::StagingSink;

const CHUNK_SIZE: usize = 64 * 1024;

/// Serves `file://` URLs by streaming the referenced file into staging.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl LocalSource {
    pub async fn download(&self, url: &Url, sink: StagingSink<'_>) -> Result<u64> {
        let path = url.to_file_path().map_err(|()| FastbinError::InvalidUrl {
            url: url.to_string(),
            reason: "not a local file path".to_string(),
        })?;
        debug!("Reading local artifact {}", path.display());

        let file = File::open(&path)
            .await
            .map_err(fs_context("open local artifact", &path))?;
        let total = file
            .metadata()
            .await
            .map_err(fs_context("stat local artifact", &path))?
            .len();

        let chunks = futures::stream::unfold(file, |mut file| async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            match file.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), file))
                }
                Err(e) => Some((Err(e), file)),
            }
        });
        sink.write_stream(chunks, Some(total)).await
    }
}

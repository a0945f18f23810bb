// fastbin-net/src/fetch.rs
//! Streams a source body into the staging directory while a timer reports progress.
use std::fmt::Display;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fastbin_common::error::{fs_context, FastbinError, Result};
use fastbin_common::{Artifact, StagingArea};
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::progress::{ProgressControl, ProgressReporter};
use crate::source::Source;
use crate::validation::{artifact_name, parse_url};

pub(crate) const PROGRESS_TICK: Duration = Duration::from_millis(200);

/// Entry point for downloads: picks a source by URL and stages the body.
pub struct Fetcher {
    staging: StagingArea,
    progress: Arc<dyn ProgressReporter>,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(
        staging: StagingArea,
        progress: Arc<dyn ProgressReporter>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            staging,
            progress,
            cancel,
        }
    }

    pub async fn fetch(&self, raw_url: &str) -> Result<Artifact> {
        let url = parse_url(raw_url)?;
        let name = artifact_name(&url)?;
        let source = Source::for_url(&url)?;
        let dest = self.staging.artifact_path(&name);
        debug!(
            "Fetching {} via {} source into {}",
            url,
            source.kind(),
            dest.display()
        );

        let sink = StagingSink {
            url: url.as_str(),
            dest: &dest,
            progress: Arc::clone(&self.progress),
            cancel: &self.cancel,
        };
        let size = source.download(&url, sink).await?;
        debug!("Fetched {} bytes from {}", size, url);
        Ok(Artifact::new(name, dest, url.to_string(), size))
    }
}

/// Where a source writes its body, plus the collaborators watching it.
pub struct StagingSink<'a> {
    pub url: &'a str,
    pub dest: &'a Path,
    pub progress: Arc<dyn ProgressReporter>,
    pub cancel: &'a CancellationToken,
}

impl StagingSink<'_> {
    /// Copies `stream` to the destination file chunk by chunk. On failure or
    /// cancellation the partial file is deleted before the error is returned.
    pub async fn write_stream<S, B, E>(self, stream: S, total: Option<u64>) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let mut file = File::create(self.dest)
            .await
            .map_err(fs_context("create staging file", self.dest))?;

        let counter = Arc::new(AtomicU64::new(0));
        self.progress.started(self.url, total);
        let ticker = ProgressTicker::spawn(
            Arc::clone(&counter),
            total,
            Arc::clone(&self.progress),
            self.cancel.clone(),
        );

        let outcome = self.pump(stream, &mut file, &counter).await;
        ticker.stop().await;

        match outcome {
            Ok(read) => {
                self.progress.update(read, total);
                self.progress.finished(read);
                Ok(read)
            }
            Err(err) => {
                drop(file);
                if let Err(e) = tokio::fs::remove_file(self.dest).await {
                    warn!(
                        "Could not remove partial download {}: {}",
                        self.dest.display(),
                        e
                    );
                }
                if matches!(err, FastbinError::UserCancelled) {
                    self.progress.cancelled();
                }
                Err(err)
            }
        }
    }

    async fn pump<S, B, E>(&self, stream: S, file: &mut File, counter: &AtomicU64) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Fetch of {} cancelled", self.url);
                    return Err(FastbinError::UserCancelled);
                }
                next = stream.next() => match next {
                    Some(Ok(chunk)) => {
                        let chunk = chunk.as_ref();
                        file.write_all(chunk)
                            .await
                            .map_err(fs_context("write staging file", self.dest))?;
                        counter.fetch_add(chunk.len() as u64, Ordering::Relaxed);
                    }
                    Some(Err(e)) => return Err(FastbinError::network(self.url, e)),
                    None => break,
                },
            }
        }
        file.flush()
            .await
            .map_err(fs_context("flush staging file", self.dest))?;
        Ok(counter.load(Ordering::Relaxed))
    }
}

/// Timer task that samples the byte counter and forwards it to the reporter.
struct ProgressTicker {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    fn spawn(
        counter: Arc<AtomicU64>,
        total: Option<u64>,
        progress: Arc<dyn ProgressReporter>,
        cancel: CancellationToken,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(PROGRESS_TICK);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let read = counter.load(Ordering::Relaxed);
                        if progress.update(read, total) == ProgressControl::Cancel {
                            cancel.cancel();
                        }
                    }
                }
            }
        });
        Self { stop_tx, handle }
    }

    async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.handle.await {
            warn!("Progress ticker ended abnormally: {}", e);
        }
    }
}

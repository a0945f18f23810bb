// fastbin-net/src/progress.rs
//! Progress collaborator interface.
/// What the progress collaborator wants the fetch to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressControl {
    Continue,
    Cancel,
}

/// Receives fetch progress. Called from a timer, never once per read.
///
/// `total` is `None` when the source did not announce a length.
pub trait ProgressReporter: Send + Sync {
    fn started(&self, url: &str, total: Option<u64>);

    fn update(&self, read: u64, total: Option<u64>) -> ProgressControl;

    fn finished(&self, read: u64);

    fn cancelled(&self);
}

/// Reporter for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn started(&self, _url: &str, _total: Option<u64>) {}

    fn update(&self, _read: u64, _total: Option<u64>) -> ProgressControl {
        ProgressControl::Continue
    }

    fn finished(&self, _read: u64) {}

    fn cancelled(&self) {}
}

// fastbin-net/src/lib.rs
pub mod fetch;
pub mod http;
pub mod local;
pub mod progress;
pub mod source;
pub mod validation;

pub use fetch::Fetcher;
pub use progress::{NoopProgress, ProgressControl, ProgressReporter};
pub use source::Source;
pub use tokio_util::sync::CancellationToken;
pub use validation::{artifact_name, parse_url, verify_checksum};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FastbinError {
    #[error("Network Error: request to '{url}' failed: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP Status Error: '{url}' responded with {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported Format: cannot unpack '{}' (extension '{extension}')", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Archive Corrupt: {}: {reason}", path.display())]
    ArchiveCorrupt { path: PathBuf, reason: String },

    #[error("No Candidates Found: '{}' contains no installable binaries", path.display())]
    NoCandidatesFound { path: PathBuf },

    #[error("Installation cancelled by user")]
    UserCancelled,

    #[error("Filesystem Error: failed to {op} '{}': {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Database Locked: cannot acquire lock on binary database '{}' within {timeout_ms}ms", path.display())]
    DatabaseLocked { path: PathBuf, timeout_ms: u128 },

    #[error("Checksum Mismatch for '{}': expected {expected}, got {actual}", path.display())]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("Database Error: {0}")]
    Database(#[from] Arc<rusqlite::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Not Installed: no record for '{0}'")]
    NotInstalled(String),

    #[error("Invalid Record for '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("Prompt Error: {0}")]
    Prompt(String),
}

impl FastbinError {
    /// Wraps an I/O error with the operation and path it failed on.
    pub fn filesystem(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        FastbinError::Filesystem {
            op,
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }

    pub fn network(url: &str, reason: impl ToString) -> Self {
        FastbinError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn corrupt(path: &Path, reason: impl ToString) -> Self {
        FastbinError::ArchiveCorrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Builds a `map_err` adapter that turns an I/O error into
/// [`FastbinError::Filesystem`] for `op` on `path`.
///
/// ```ignore
/// fs::create_dir_all(dir).map_err(fs_context("create directory", dir))?;
/// ```
pub fn fs_context<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> FastbinError + 'a {
    move |e| FastbinError::filesystem(op, path, e)
}

impl From<std::io::Error> for FastbinError {
    fn from(err: std::io::Error) -> Self {
        FastbinError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for FastbinError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        FastbinError::Network {
            url,
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FastbinError {
    fn from(err: serde_json::Error) -> Self {
        FastbinError::Json(Arc::new(err))
    }
}

impl From<rusqlite::Error> for FastbinError {
    fn from(err: rusqlite::Error) -> Self {
        FastbinError::Database(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FastbinError>;

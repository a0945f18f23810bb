// fastbin-net/src/validation.rs
use std::path::Path;

use fastbin_common::checksum::sha256_file;
use fastbin_common::error::{FastbinError, Result};
use url::Url;

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| FastbinError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// The artifact name is the last non-empty path segment; query and fragment are ignored.
pub fn artifact_name(url: &Url) -> Result<String> {
    let name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .filter(|s| *s != "." && *s != "..")
        .ok_or_else(|| FastbinError::InvalidUrl {
            url: url.to_string(),
            reason: "URL path does not name a file".to_string(),
        })?;
    Ok(name.to_string())
}

pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let (actual, _) = sha256_file(path)?;
    tracing::debug!("Expected SHA256:   {}", expected);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(FastbinError::HashMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

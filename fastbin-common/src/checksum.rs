// fastbin-common/src/checksum.rs
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{fs_context, Result};

/// Hashes everything `reader` yields and returns the hex digest with the byte count.
pub fn sha256_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let bytes = io::copy(reader, &mut hasher)?;
    Ok((hex::encode(hasher.finalize()), bytes))
}

/// Reads a file back from disk and returns its hex-encoded SHA-256 and size.
pub fn sha256_file(path: &Path) -> Result<(String, u64)> {
    tracing::debug!("Hashing {}", path.display());
    let mut file = File::open(path).map_err(fs_context("open for hashing", path))?;
    let (digest, bytes) = sha256_reader(&mut file).map_err(fs_context("hash", path))?;
    tracing::debug!("Calculated SHA256: {} ({} bytes read)", digest, bytes);
    Ok((digest, bytes))
}

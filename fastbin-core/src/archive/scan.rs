// fastbin-core/src/archive/scan.rs
use std::path::Path;

use fastbin_common::error::{FastbinError, Result};
use fastbin_common::Codec;
use tar::EntryType;
use tracing::{debug, trace};

use super::open_tar;

/// A header seen while walking the archive. Bodies are not read during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position of the header in the tar stream, counting every entry.
    pub index: usize,
    /// Archive-relative path, as stored in the header.
    pub path: String,
    pub mode: u32,
    pub size: u64,
}

impl ArchiveEntry {
    pub fn base_name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.path)
    }

    /// Any of the owner/group/other execute bits.
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// The candidate pool of an archive: extensionless regular files, in
/// archive order. Kept whole even when none of them is executable so the
/// user can still pick one.
///
/// Paths are unique. When a path repeats, the last header wins, as it would
/// when the archive is unpacked in full.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub pool: Vec<ArchiveEntry>,
}

impl ScanReport {
    pub fn executables(&self) -> Vec<&ArchiveEntry> {
        self.pool.iter().filter(|e| e.is_executable()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

// Companion files (LICENSE.md, checksums.txt, foo.1) carry extensions; payloads do not.
fn looks_like_payload(base_name: &str) -> bool {
    !base_name.is_empty()
        && !base_name.starts_with('.')
        && Path::new(base_name).extension().is_none()
}

/// First pass over the archive: enumerate headers and build the candidate pool.
pub fn scan_archive(archive_path: &Path, codec: Codec) -> Result<ScanReport> {
    debug!(
        "Scanning {} archive {}",
        codec,
        archive_path.display()
    );
    let mut archive = open_tar(archive_path, codec)?;
    let mut report = ScanReport::default();

    let entries = archive
        .entries()
        .map_err(|e| FastbinError::corrupt(archive_path, e))?;
    for (index, entry_result) in entries.enumerate() {
        let entry = entry_result.map_err(|e| {
            FastbinError::corrupt(archive_path, format!("error reading tar entry: {e}"))
        })?;
        let header = entry.header();
        let path = entry
            .path()
            .map_err(|e| FastbinError::corrupt(archive_path, format!("invalid entry path: {e}")))?
            .to_string_lossy()
            .into_owned();

        if let Some(pos) = report.pool.iter().position(|c| c.path == path) {
            debug!(
                "{} appears again at entry {}; dropping the earlier header",
                path, index
            );
            report.pool.remove(pos);
        }

        match header.entry_type() {
            EntryType::Regular | EntryType::Continuous => {}
            EntryType::Directory => continue,
            other => {
                trace!("Skipping non-regular entry of type {:?}", other);
                continue;
            }
        }

        let mode = header
            .mode()
            .map_err(|e| FastbinError::corrupt(archive_path, format!("bad mode for {path}: {e}")))?;
        let candidate = ArchiveEntry {
            index,
            path,
            mode,
            size: entry.size(),
        };

        if !looks_like_payload(candidate.base_name()) {
            trace!("Skipping companion file {}", candidate.path);
            continue;
        }
        debug!(
            "Candidate {} (mode {:o}, executable: {})",
            candidate.path,
            candidate.mode,
            candidate.is_executable()
        );
        report.pool.push(candidate);
    }

    debug!(
        "Scan of {} found {} candidate(s), {} executable",
        archive_path.display(),
        report.pool.len(),
        report.executables().len()
    );
    Ok(report)
}

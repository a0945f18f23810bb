// fastbin-core/src/install/mod.rs
//! Turning staged files into installed binaries.
use std::path::Path;

use fastbin_common::error::Result;

pub mod extract;
pub mod mover;

pub use extract::{extract_entries, promote_binary};
pub use mover::Installer;

/// Mode given to every file that ends up in the bin home.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Sets `path` to [`EXECUTABLE_MODE`], regardless of what it had before.
#[cfg(unix)]
pub fn force_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    use fastbin_common::error::fs_context;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(fs_context("set permissions on", path))?;
    tracing::trace!("Set mode {:o} on {}", EXECUTABLE_MODE, path.display());
    Ok(())
}

#[cfg(not(unix))]
pub fn force_executable(path: &Path) -> Result<()> {
    tracing::trace!("No permission bits to set on {}", path.display());
    Ok(())
}

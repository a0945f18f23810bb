// fastbin-common/src/staging.rs
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{fs_context, Result};

/// Process-scoped scratch space holding every temporary file of an install.
///
/// Created once per invocation and handed to each stage explicitly. Files
/// left behind by a failed attempt are not removed here; the directory lives
/// under the system temp dir and is reclaimed with it.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn create(root: &Path) -> Result<Self> {
        debug!("Preparing staging directory {}", root.display());
        fs::create_dir_all(root).map_err(fs_context("create staging directory", root))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Where a downloaded artifact named `name` is written.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// A fresh directory for entries extracted out of `artifact_name`.
    pub fn extraction_dir(&self, artifact_name: &str) -> Result<PathBuf> {
        let dir = self
            .root
            .join("extract")
            .join(format!("{artifact_name}.d"));
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(fs_context("clear extraction directory", &dir))?;
        }
        fs::create_dir_all(&dir).map_err(fs_context("create extraction directory", &dir))?;
        Ok(dir)
    }
}

// fastbin-core/src/install/mover.rs
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use fastbin_common::checksum::sha256_file;
use fastbin_common::error::{fs_context, FastbinError, Result};
use fastbin_common::Binary;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::force_executable;

type RenameFn = fn(&Path, &Path) -> io::Result<()>;

fn rename_in_place(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Moves staged binaries into the bin home.
pub struct Installer {
    bin_home: PathBuf,
    rename: RenameFn,
}

impl Installer {
    pub fn new(bin_home: &Path) -> Result<Self> {
        fs::create_dir_all(bin_home).map_err(fs_context("create bin home", bin_home))?;
        Ok(Self {
            bin_home: bin_home.to_path_buf(),
            rename: rename_in_place,
        })
    }

    /// Replaces the rename primitive, e.g. to simulate a cross-device move.
    pub fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    pub fn bin_home(&self) -> &Path {
        &self.bin_home
    }

    /// Moves `binary` to `<bin_home>/<name>`, replacing whatever is there, and
    /// points `binary.location` at the new path.
    pub fn install(&self, binary: &mut Binary) -> Result<PathBuf> {
        let dest = self.bin_home.join(&binary.name);
        debug!(
            "Installing {} -> {}",
            binary.location.display(),
            dest.display()
        );

        match (self.rename)(&binary.location, &dest) {
            Ok(()) => {}
            Err(e) => {
                debug!(
                    "Rename of {} failed ({}); falling back to copy",
                    binary.location.display(),
                    e
                );
                self.copy_across(&binary.location, &dest)?;
            }
        }
        force_executable(&dest)?;

        binary.location = dest.clone();
        Ok(dest)
    }

    /// Copy-verify-replace used when a plain rename is not possible.
    fn copy_across(&self, source: &Path, dest: &Path) -> Result<()> {
        let mut staged = NamedTempFile::new_in(&self.bin_home)
            .map_err(fs_context("create temporary file in", &self.bin_home))?;
        {
            let mut reader = File::open(source).map_err(fs_context("open", source))?;
            io::copy(&mut reader, staged.as_file_mut())
                .map_err(fs_context("copy into", staged.path()))?;
            staged
                .as_file()
                .sync_all()
                .map_err(fs_context("sync", staged.path()))?;
        }
        let permissions = fs::metadata(source)
            .map_err(fs_context("read metadata of", source))?
            .permissions();
        fs::set_permissions(staged.path(), permissions)
            .map_err(fs_context("set permissions on", staged.path()))?;

        let (expected, _) = sha256_file(source)?;
        let (actual, _) = sha256_file(staged.path())?;
        if expected != actual {
            // `staged` is dropped here and removed with it.
            return Err(FastbinError::HashMismatch {
                path: dest.to_path_buf(),
                expected,
                actual,
            });
        }

        staged
            .persist(dest)
            .map_err(|e| FastbinError::filesystem("replace", dest, e.error))?;
        if let Err(e) = fs::remove_file(source) {
            warn!(
                "Installed {} but could not remove staged copy {}: {}",
                dest.display(),
                source.display(),
                e
            );
        }
        Ok(())
    }
}

// fastbin-core/src/uninstall.rs
use std::fs;
use std::io;
use std::path::Path;

use fastbin_common::checksum::sha256_file;
use fastbin_common::error::{FastbinError, Result};
use fastbin_common::InstallRecord;
use tracing::{debug, warn};

use crate::store::MetadataStore;

/// Removes an installed binary and its record.
///
/// The file is only deleted while its contents still match the recorded hash;
/// a file replaced by something else is left alone and only the record goes.
pub fn uninstall(store: &mut MetadataStore, name: &str) -> Result<InstallRecord> {
    let record = store
        .get(name)?
        .ok_or_else(|| FastbinError::NotInstalled(name.to_string()))?;
    let location = Path::new(&record.location);

    match fs::symlink_metadata(location) {
        Ok(_) => {
            let (actual, _) = sha256_file(location)?;
            if actual == record.hash {
                fs::remove_file(location)
                    .map_err(|e| FastbinError::filesystem("remove", location, e))?;
                debug!("Removed {}", location.display());
            } else {
                warn!(
                    "{} no longer matches the installed {}; leaving it in place",
                    location.display(),
                    name
                );
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{} is already gone", location.display());
        }
        Err(e) => return Err(FastbinError::filesystem("inspect", location, e)),
    }

    store.remove(name)?;
    Ok(record)
}

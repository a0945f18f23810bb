// fastbin-core/src/install/extract.rs
use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use fastbin_common::checksum::sha256_file;
use fastbin_common::error::{fs_context, FastbinError, Result};
use fastbin_common::{Artifact, Binary, Codec};
use tar::EntryType;
use tracing::{debug, error};

use super::force_executable;
use crate::archive::{open_tar, ArchiveEntry};

/// Maps an archive-relative path onto `out_dir`, refusing anything that could
/// land outside it.
fn target_path(out_dir: &Path, entry_path: &str, archive_path: &Path) -> Result<PathBuf> {
    let mut target = out_dir.to_path_buf();
    for comp in Path::new(entry_path).components() {
        match comp {
            Component::Normal(p) => target.push(p),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                error!("Unsafe component {:?} in archive path {}", comp, entry_path);
                return Err(FastbinError::corrupt(
                    archive_path,
                    format!("unsafe path '{entry_path}'"),
                ));
            }
        }
    }
    if target == out_dir {
        return Err(FastbinError::corrupt(
            archive_path,
            format!("empty path '{entry_path}'"),
        ));
    }
    Ok(target)
}

/// Second pass over the archive: writes only the `chosen` entries into
/// `out_dir` and returns them as staged binaries, in archive order.
///
/// The archive is re-opened from the start; the scan already consumed the
/// first stream.
pub fn extract_entries(
    archive_path: &Path,
    codec: Codec,
    chosen: &[ArchiveEntry],
    out_dir: &Path,
) -> Result<Vec<Binary>> {
    debug!(
        "Extracting {} entr{} from {} into {}",
        chosen.len(),
        if chosen.len() == 1 { "y" } else { "ies" },
        archive_path.display(),
        out_dir.display()
    );

    let mut wanted: HashMap<usize, (&ArchiveEntry, PathBuf)> =
        HashMap::with_capacity(chosen.len());
    for entry in chosen {
        let target = target_path(out_dir, &entry.path, archive_path)?;
        wanted.insert(entry.index, (entry, target));
    }

    let mut archive = open_tar(archive_path, codec)?;
    let entries = archive
        .entries()
        .map_err(|e| FastbinError::corrupt(archive_path, e))?;
    let mut written: HashMap<usize, Binary> = HashMap::with_capacity(chosen.len());

    for (index, entry_result) in entries.enumerate() {
        if written.len() == wanted.len() {
            break;
        }
        let mut entry = entry_result.map_err(|e| {
            FastbinError::corrupt(archive_path, format!("error reading tar entry: {e}"))
        })?;
        let Some((expected, target)) = wanted.get(&index) else {
            continue;
        };
        let path = entry
            .path()
            .map_err(|e| FastbinError::corrupt(archive_path, format!("invalid entry path: {e}")))?
            .to_string_lossy()
            .into_owned();
        if path != expected.path
            || !matches!(
                entry.header().entry_type(),
                EntryType::Regular | EntryType::Continuous
            )
        {
            return Err(FastbinError::corrupt(
                archive_path,
                format!(
                    "entry {} changed between passes: expected '{}', found '{}'",
                    index, expected.path, path
                ),
            ));
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(fs_context("create directory", parent))?;
        }
        let mut out = File::create(target).map_err(fs_context("create file", target))?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            FastbinError::corrupt(archive_path, format!("failed to read body of {path}: {e}"))
        })?;
        drop(out);
        force_executable(target)?;

        let (hash, size) = sha256_file(target)?;
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        debug!("Extracted {} -> {} ({} bytes)", path, target.display(), size);
        written.insert(index, Binary::staged(name, target.clone(), hash, size));
    }

    chosen
        .iter()
        .map(|entry| {
            written.remove(&entry.index).ok_or_else(|| {
                FastbinError::corrupt(
                    archive_path,
                    format!("entry '{}' not found on second pass", entry.path),
                )
            })
        })
        .collect()
}

/// Treats a downloaded artifact as the executable itself.
pub fn promote_binary(artifact: &Artifact) -> Result<Binary> {
    let (hash, size) = sha256_file(&artifact.location)?;
    debug!("Promoting {} as a binary ({} bytes)", artifact.name, size);
    Ok(Binary::staged(
        artifact.name.clone(),
        artifact.location.clone(),
        hash,
        size,
    ))
}

#[cfg(test)]
mod tests {
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    use super::*;
    use crate::archive::scan_archive;
    use crate::archive::testutil::{write_archive, Item};

    #[test]
    fn only_chosen_entries_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "kit.tar.gz",
            Codec::Gzip,
            &[
                Item::Dir("kit/"),
                Item::File("kit/alpha", 0o755, b"alpha"),
                Item::File("kit/beta", 0o755, b"beta!"),
                Item::File("kit/notes", 0o644, b"notes"),
            ],
        );
        let report = scan_archive(&archive, Codec::Gzip).unwrap();
        let chosen: Vec<ArchiveEntry> = report
            .pool
            .iter()
            .filter(|e| e.path != "kit/alpha")
            .cloned()
            .collect();
        let out = dir.path().join("out");

        let binaries = extract_entries(&archive, Codec::Gzip, &chosen, &out).unwrap();
        let names: Vec<&str> = binaries.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "notes"]);
        assert!(!out.join("kit/alpha").exists());
        assert_eq!(fs::read(out.join("kit/beta")).unwrap(), b"beta!");
        assert_eq!(binaries[0].size, 5);
        assert_eq!(binaries[0].location, out.join("kit/beta"));
    }

    #[cfg(unix)]
    #[test]
    fn extracted_files_are_forced_executable() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "t.tar",
            Codec::None,
            &[Item::File("plain", 0o600, b"data")],
        );
        let report = scan_archive(&archive, Codec::None).unwrap();
        let out = dir.path().join("out");
        let binaries = extract_entries(&archive, Codec::None, &report.pool, &out).unwrap();
        let mode = fs::metadata(&binaries[0].location)
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn parent_components_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "t.tar",
            Codec::None,
            &[Item::File("ok", 0o755, b"x")],
        );
        let evil = ArchiveEntry {
            index: 0,
            path: "../escape".to_string(),
            mode: 0o755,
            size: 1,
        };
        let err =
            extract_entries(&archive, Codec::None, &[evil], &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, FastbinError::ArchiveCorrupt { .. }), "{err:?}");
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn entry_missing_on_second_pass_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "t.tar",
            Codec::None,
            &[Item::File("present", 0o755, b"x")],
        );
        let ghost = ArchiveEntry {
            index: 7,
            path: "ghost".to_string(),
            mode: 0o755,
            size: 1,
        };
        let err =
            extract_entries(&archive, Codec::None, &[ghost], &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, FastbinError::ArchiveCorrupt { .. }));
    }

    #[test]
    fn repeated_path_extracts_the_body_of_the_last_header() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "dup.tar.gz",
            Codec::Gzip,
            &[
                Item::File("tool", 0o644, b"OLD-NONEXEC"),
                Item::File("tool", 0o755, b"NEW-EXEC"),
            ],
        );
        let report = scan_archive(&archive, Codec::Gzip).unwrap();
        assert_eq!(report.pool.len(), 1);
        let out = dir.path().join("out");

        let binaries = extract_entries(&archive, Codec::Gzip, &report.pool, &out).unwrap();
        assert_eq!(binaries.len(), 1);
        assert_eq!(fs::read(out.join("tool")).unwrap(), b"NEW-EXEC");
        assert_eq!(binaries[0].size, 8);
        assert_eq!(binaries[0].hash, sha256_file(&out.join("tool")).unwrap().0);
    }

    #[test]
    fn entry_at_a_different_position_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "t.tar",
            Codec::None,
            &[
                Item::File("first", 0o755, b"1"),
                Item::File("second", 0o755, b"2"),
            ],
        );
        let misplaced = ArchiveEntry {
            index: 0,
            path: "second".to_string(),
            mode: 0o755,
            size: 1,
        };
        let out = dir.path().join("out");
        let err = extract_entries(&archive, Codec::None, &[misplaced], &out).unwrap_err();
        assert!(matches!(err, FastbinError::ArchiveCorrupt { .. }), "{err:?}");
        assert!(!out.join("second").exists());
    }

    #[test]
    fn promoted_binary_carries_hash_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("jq");
        fs::write(&location, b"hello world").unwrap();
        let artifact = Artifact::new(
            "jq".to_string(),
            location.clone(),
            "https://example.com/jq".to_string(),
            11,
        );
        let binary = promote_binary(&artifact).unwrap();
        assert_eq!(binary.name, "jq");
        assert_eq!(binary.location, location);
        assert_eq!(binary.size, 11);
        assert_eq!(
            binary.hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}

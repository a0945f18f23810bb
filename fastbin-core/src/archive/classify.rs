// fastbin-core/src/archive/classify.rs
use std::path::Path;

use fastbin_common::error::{FastbinError, Result};
use fastbin_common::{Artifact, ArtifactKind, Codec};
use tracing::debug;

use crate::install::force_executable;

/// Maps a file extension (without the dot) to the codec wrapping its tar stream.
pub fn codec_for_extension(extension: &str) -> Option<Codec> {
    match extension.to_ascii_lowercase().as_str() {
        "gz" | "tgz" => Some(Codec::Gzip),
        "bz2" | "bzip2" | "tbz" | "tbz2" => Some(Codec::Bzip2),
        "xz" | "txz" => Some(Codec::Xz),
        "tar" => Some(Codec::None),
        _ => None,
    }
}

/// Decides whether the staged artifact is the executable itself or an archive.
///
/// An extensionless artifact is a binary and gets its execute bits forced on
/// here. Anything else must carry a known archive extension; no extraction is
/// attempted for unknown ones.
pub fn classify(artifact: &mut Artifact) -> Result<ArtifactKind> {
    let kind = match Path::new(&artifact.name).extension() {
        None => {
            force_executable(&artifact.location)?;
            ArtifactKind::Binary
        }
        Some(ext) => {
            let ext = ext.to_string_lossy();
            let codec =
                codec_for_extension(&ext).ok_or_else(|| FastbinError::UnsupportedFormat {
                    path: artifact.location.clone(),
                    extension: ext.to_string(),
                })?;
            ArtifactKind::Archive(codec)
        }
    };
    debug!("Classified {} as {:?}", artifact.name, kind);
    artifact.kind = Some(kind);
    Ok(kind)
}

// fastbin-common/src/model/artifact.rs
use std::fmt;
use std::path::PathBuf;

/// Decompression applied to a tar stream before it can be walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Gzip,
    Bzip2,
    Xz,
    /// Plain, uncompressed tar.
    None,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Gzip => "gzip",
            Codec::Bzip2 => "bzip2",
            Codec::Xz => "xz",
            Codec::None => "tar",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The download is the executable itself.
    Binary,
    /// A tar archive wrapped in the given codec.
    Archive(Codec),
}

/// The raw file produced by a fetch, before and after classification.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub location: PathBuf,
    pub source_url: String,
    pub size: u64,
    /// Set by the classifier; `None` straight after the fetch.
    pub kind: Option<ArtifactKind>,
}

impl Artifact {
    pub fn new(name: String, location: PathBuf, source_url: String, size: u64) -> Self {
        Self {
            name,
            location,
            source_url,
            size,
            kind: None,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self.kind, Some(ArtifactKind::Archive(_)))
    }
}

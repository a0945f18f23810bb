// fastbin-common/src/model/binary.rs
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An installable executable, from the moment it is staged until it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub name: String,
    pub version: String,
    pub source_url: String,
    /// Staging path until installed, then the path inside the bin home.
    pub location: PathBuf,
    /// Hex-encoded SHA-256 of the file contents.
    pub hash: String,
    pub size: u64,
    pub last_updated: DateTime<Utc>,
    pub architecture: String,
    pub os: String,
    pub scripts: Vec<PathBuf>,
    pub man_page: Option<PathBuf>,
}

impl Binary {
    pub fn staged(name: String, location: PathBuf, hash: String, size: u64) -> Self {
        Self {
            name,
            version: String::new(),
            source_url: String::new(),
            location,
            hash,
            size,
            last_updated: Utc::now(),
            architecture: String::new(),
            os: String::new(),
            scripts: Vec::new(),
            man_page: None,
        }
    }

    /// Fills version and platform tags from the artifact the binary came from.
    pub fn with_source(mut self, source_url: &str, artifact_name: &str) -> Self {
        self.source_url = source_url.to_string();
        self.version = infer_version(artifact_name).unwrap_or_default();
        let (arch, os) = infer_platform(artifact_name);
        self.architecture = arch;
        self.os = os;
        self
    }
}

/// The persisted projection of a [`Binary`], keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub name: String,
    pub version: String,
    pub source_url: String,
    pub location: String,
    pub hash: String,
    pub last_updated: DateTime<Utc>,
    pub scripts: Vec<String>,
    pub man_page: String,
    pub size: u64,
    pub architecture: String,
    pub os: String,
}

impl From<&Binary> for InstallRecord {
    fn from(binary: &Binary) -> Self {
        Self {
            name: binary.name.clone(),
            version: binary.version.clone(),
            source_url: binary.source_url.clone(),
            location: binary.location.to_string_lossy().into_owned(),
            hash: binary.hash.clone(),
            last_updated: binary.last_updated,
            scripts: binary
                .scripts
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            man_page: binary
                .man_page
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: binary.size,
            architecture: binary.architecture.clone(),
            os: binary.os.clone(),
        }
    }
}

const ARCH_ALIASES: &[(&str, &str)] = &[
    ("x86_64", "x86_64"),
    ("amd64", "x86_64"),
    ("x64", "x86_64"),
    ("aarch64", "aarch64"),
    ("arm64", "aarch64"),
    ("armv7", "arm"),
    ("arm", "arm"),
    ("i686", "x86"),
    ("i386", "x86"),
    ("386", "x86"),
];

const OS_ALIASES: &[(&str, &str)] = &[
    ("linux", "linux"),
    ("darwin", "macos"),
    ("macos", "macos"),
    ("apple", "macos"),
    ("osx", "macos"),
    ("windows", "windows"),
    ("win64", "windows"),
    ("freebsd", "freebsd"),
];

fn name_tokens(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(['-', '_', '.'])
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

/// Picks the first `v1.2.3` / `1.2`-shaped token out of an artifact name.
pub fn infer_version(artifact_name: &str) -> Option<String> {
    artifact_name
        .split(['-', '_'])
        .find_map(|token| {
            let bare = token.strip_prefix('v').unwrap_or(token);
            let mut parts = bare.split('.');
            let major = parts.next()?;
            let minor = parts.next()?;
            let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
            (numeric(major) && numeric(minor)).then(|| {
                // Drop trailing archive extensions glued onto the last token.
                let kept: Vec<&str> = bare.split('.').take_while(|p| numeric(p)).collect();
                kept.join(".")
            })
        })
}

/// Returns `(architecture, os)`, falling back to the host for anything the
/// name does not mention.
pub fn infer_platform(artifact_name: &str) -> (String, String) {
    let lower = artifact_name.to_ascii_lowercase();
    // Multi-part tags like x86_64 span a separator, so match them on the raw name first.
    let arch = ARCH_ALIASES
        .iter()
        .find(|(alias, _)| {
            alias.contains('_') && lower.contains(alias)
                || name_tokens(artifact_name).any(|t| t == *alias)
        })
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string());
    let os = OS_ALIASES
        .iter()
        .find(|(alias, _)| name_tokens(artifact_name).any(|t| t == *alias))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| std::env::consts::OS.to_string());
    (arch, os)
}

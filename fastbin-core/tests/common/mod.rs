// fastbin-core/tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fastbin_common::error::Result;
use fastbin_common::{Codec, Config, StagingArea};
use fastbin_core::{Disambiguator, MetadataStore, Selection, SelectionRequest};
use fastbin_net::NoopProgress;
use sha2::{Digest, Sha256};
use tar::{Builder, EntryType, Header};

/// Everything an install needs, rooted in one temp directory.
pub struct Sandbox {
    pub root: tempfile::TempDir,
    pub config: Config,
    pub staging: StagingArea,
    pub store: MetadataStore,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let config = Config::with_root(root.path());
        let staging = StagingArea::create(config.staging_dir()).unwrap();
        let store = MetadataStore::open(&config.db_path(), config.db_timeout).unwrap();
        Self {
            root,
            config,
            staging,
            store,
        }
    }

    /// A directory outside staging and bin home for source files.
    pub fn downloads(&self) -> PathBuf {
        let dir = self.root.path().join("downloads");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn bin(&self, name: &str) -> PathBuf {
        self.config.bin_home().join(name)
    }
}

pub fn noop_progress() -> Arc<NoopProgress> {
    Arc::new(NoopProgress)
}

pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path).unwrap().to_string()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Answers every prompt the same way and remembers what it was asked.
pub struct ScriptedChooser {
    answer: Selection,
    pub requests: RefCell<Vec<SelectionRequest>>,
}

impl ScriptedChooser {
    pub fn picking(names: &[&str]) -> Self {
        Self {
            answer: Selection::Chosen(names.iter().map(|s| s.to_string()).collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn cancelling() -> Self {
        Self {
            answer: Selection::Cancelled,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn offered(&self) -> Vec<Vec<String>> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.options.iter().map(|o| o.name.clone()).collect())
            .collect()
    }
}

impl Disambiguator for ScriptedChooser {
    fn choose(&self, request: &SelectionRequest) -> Result<Selection> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.answer.clone())
    }
}

/// Writes a tar of regular files `(path, mode, body)` compressed with `codec`.
pub fn write_archive(dir: &Path, name: &str, codec: Codec, files: &[(&str, u32, &[u8])]) -> PathBuf {
    let mut builder = Builder::new(Vec::new());
    for (path, mode, body) in files {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(*mode);
        header.set_size(body.len() as u64);
        builder.append_data(&mut header, path, *body).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let bytes = match codec {
        Codec::Gzip => {
            let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
            enc.write_all(&tar).unwrap();
            enc.finish().unwrap()
        }
        Codec::Bzip2 => {
            let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
            enc.write_all(&tar).unwrap();
            enc.finish().unwrap()
        }
        Codec::Xz => {
            let mut enc = xz2::write::XzEncoder::new(Vec::new(), 1);
            enc.write_all(&tar).unwrap();
            enc.finish().unwrap()
        }
        Codec::None => tar,
    };
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

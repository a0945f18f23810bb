// fastbin-core/src/archive/mod.rs
//! Recognising downloaded archives and walking the tar stream inside them.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use fastbin_common::error::{fs_context, Result};
use fastbin_common::Codec;
use flate2::read::GzDecoder;
use tar::Archive;
use xz2::read::XzDecoder;

pub mod classify;
pub mod scan;

pub use classify::{classify, codec_for_extension};
pub use scan::{scan_archive, ArchiveEntry, ScanReport};

/// Opens `path` as a forward-only tar stream behind the given decompressor.
///
/// Every call starts from the first byte; a second pass over the archive
/// means calling this again.
pub(crate) fn open_tar(path: &Path, codec: Codec) -> Result<Archive<Box<dyn Read>>> {
    let file = File::open(path).map_err(fs_context("open archive", path))?;
    let reader = BufReader::new(file);
    let decoded: Box<dyn Read> = match codec {
        Codec::Gzip => Box::new(GzDecoder::new(reader)),
        Codec::Bzip2 => Box::new(BzDecoder::new(reader)),
        Codec::Xz => Box::new(XzDecoder::new(reader)),
        Codec::None => Box::new(reader),
    };
    Ok(Archive::new(decoded))
}

// fastbin-common/src/lib.rs
pub mod checksum;
pub mod config;
pub mod error;
pub mod model;
pub mod staging;

// Re-export key types
pub use config::Config;
pub use error::{FastbinError, Result};
pub use model::{Artifact, ArtifactKind, Binary, Codec, InstallRecord};
pub use staging::StagingArea;

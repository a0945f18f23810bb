// fastbin-common/src/model/mod.rs
pub mod artifact;
pub mod binary;

pub use artifact::{Artifact, ArtifactKind, Codec};
pub use binary::{Binary, InstallRecord};

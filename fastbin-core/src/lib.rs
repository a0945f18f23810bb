// fastbin-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod archive;
pub mod install;
pub mod select;
pub mod store;
pub mod uninstall;
pub mod workflow;

// Re-export key types for easier use by the CLI crate
pub use install::Installer;
pub use select::{CandidateOption, Disambiguator, Selection, SelectionMode, SelectionRequest};
pub use store::MetadataStore;
pub use uninstall::uninstall;
pub use workflow::{InstallOptions, InstallWorkflow};

// fastbin/src/ui/mod.rs
//! Terminal renderings of the progress and selection collaborators.
pub mod progress;
pub mod prompt;

pub use progress::IndicatifProgress;
pub use prompt::DialoguerDisambiguator;

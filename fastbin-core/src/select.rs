// fastbin-core/src/select.rs
//! Choosing which archive entries to install.
//!
//! A single executable candidate is taken as-is. Everything else goes through
//! a [`Disambiguator`], which the CLI backs with an interactive prompt and
//! tests back with a scripted stub.
use std::collections::HashSet;
use std::path::Path;

use fastbin_common::error::{FastbinError, Result};
use tracing::debug;

use crate::archive::{ArchiveEntry, ScanReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOption {
    pub name: String,
    pub executable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Exactly one option must be picked.
    Single,
    /// One or more options may be picked.
    Multiple,
}

#[derive(Debug, Clone)]
pub struct SelectionRequest {
    pub artifact: String,
    pub mode: SelectionMode,
    pub options: Vec<CandidateOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(Vec<String>),
    Cancelled,
}

pub trait Disambiguator {
    /// Blocks until the user picks from `request.options` or cancels.
    fn choose(&self, request: &SelectionRequest) -> Result<Selection>;
}

/// Resolves the candidate pool down to the entries to extract, in archive order.
///
/// With no executable candidates the whole pool is offered for a single pick;
/// with several, only the executables are offered and any subset may be taken.
pub fn select_candidates(
    report: &ScanReport,
    artifact_path: &Path,
    disambiguator: &dyn Disambiguator,
) -> Result<Vec<ArchiveEntry>> {
    if report.is_empty() {
        return Err(FastbinError::NoCandidatesFound {
            path: artifact_path.to_path_buf(),
        });
    }

    let executables = report.executables();
    if let [only] = executables.as_slice() {
        debug!("Auto-selecting sole executable {}", only.path);
        return Ok(vec![(*only).clone()]);
    }

    let (mode, offered): (SelectionMode, Vec<&ArchiveEntry>) = if executables.is_empty() {
        debug!("No executable candidates; offering the full pool");
        (SelectionMode::Single, report.pool.iter().collect())
    } else {
        (SelectionMode::Multiple, executables)
    };

    let request = SelectionRequest {
        artifact: artifact_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mode,
        options: offered
            .iter()
            .map(|e| CandidateOption {
                name: e.path.clone(),
                executable: e.is_executable(),
            })
            .collect(),
    };

    let chosen = match disambiguator.choose(&request)? {
        Selection::Cancelled => return Err(FastbinError::UserCancelled),
        Selection::Chosen(names) => names,
    };
    if chosen.is_empty() {
        return Err(FastbinError::NoCandidatesFound {
            path: artifact_path.to_path_buf(),
        });
    }
    if mode == SelectionMode::Single && chosen.len() != 1 {
        return Err(FastbinError::Prompt(format!(
            "expected exactly one selection, got {}",
            chosen.len()
        )));
    }

    let offered_names: HashSet<&str> = offered.iter().map(|e| e.path.as_str()).collect();
    if let Some(stray) = chosen.iter().find(|n| !offered_names.contains(n.as_str())) {
        return Err(FastbinError::Prompt(format!(
            "'{stray}' was not one of the offered candidates"
        )));
    }

    let chosen: HashSet<&str> = chosen.iter().map(String::as_str).collect();
    Ok(offered
        .into_iter()
        .filter(|e| chosen.contains(e.path.as_str()))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Scripted {
        answer: Selection,
        seen: RefCell<Option<SelectionRequest>>,
    }

    impl Scripted {
        fn new(answer: Selection) -> Self {
            Self {
                answer,
                seen: RefCell::new(None),
            }
        }
    }

    impl Disambiguator for Scripted {
        fn choose(&self, request: &SelectionRequest) -> Result<Selection> {
            *self.seen.borrow_mut() = Some(request.clone());
            Ok(self.answer.clone())
        }
    }

    fn entry(path: &str, mode: u32) -> ArchiveEntry {
        ArchiveEntry {
            index: 0,
            path: path.to_string(),
            mode,
            size: 1,
        }
    }

    fn chosen(names: &[&str]) -> Selection {
        Selection::Chosen(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn single_executable_is_taken_without_asking() {
        let report = ScanReport {
            pool: vec![entry("README", 0o644), entry("tool", 0o755)],
        };
        let stub = Scripted::new(Selection::Cancelled);
        let picked = select_candidates(&report, Path::new("t.tar.gz"), &stub).unwrap();
        assert_eq!(picked, vec![entry("tool", 0o755)]);
        assert!(stub.seen.borrow().is_none());
    }

    #[test]
    fn no_executables_offers_the_whole_pool() {
        let report = ScanReport {
            pool: vec![entry("a", 0o644), entry("b", 0o600)],
        };
        let stub = Scripted::new(chosen(&["b"]));
        let picked = select_candidates(&report, Path::new("t.tar.gz"), &stub).unwrap();
        assert_eq!(picked, vec![entry("b", 0o600)]);

        let seen = stub.seen.borrow();
        let request = seen.as_ref().unwrap();
        assert_eq!(request.mode, SelectionMode::Single);
        assert_eq!(request.artifact, "t.tar.gz");
        let names: Vec<&str> = request.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(request.options.iter().all(|o| !o.executable));
    }

    #[test]
    fn several_executables_offer_only_executables() {
        let report = ScanReport {
            pool: vec![
                entry("one", 0o755),
                entry("notes", 0o644),
                entry("two", 0o755),
                entry("three", 0o711),
            ],
        };
        // Picked out of archive order; result comes back in archive order.
        let stub = Scripted::new(chosen(&["three", "one"]));
        let picked = select_candidates(&report, Path::new("t.tar.gz"), &stub).unwrap();
        assert_eq!(picked, vec![entry("one", 0o755), entry("three", 0o711)]);

        let seen = stub.seen.borrow();
        let request = seen.as_ref().unwrap();
        assert_eq!(request.mode, SelectionMode::Multiple);
        let names: Vec<&str> = request.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn cancel_aborts_with_user_cancelled() {
        let report = ScanReport {
            pool: vec![entry("a", 0o755), entry("b", 0o755)],
        };
        let stub = Scripted::new(Selection::Cancelled);
        let err = select_candidates(&report, Path::new("t.tar.gz"), &stub).unwrap_err();
        assert!(matches!(err, FastbinError::UserCancelled));
    }

    #[test]
    fn empty_pool_has_no_candidates() {
        let stub = Scripted::new(Selection::Cancelled);
        let err =
            select_candidates(&ScanReport::default(), Path::new("t.tar.gz"), &stub).unwrap_err();
        assert!(matches!(err, FastbinError::NoCandidatesFound { .. }));
    }

    #[test]
    fn empty_choice_and_unknown_names_are_rejected() {
        let report = ScanReport {
            pool: vec![entry("a", 0o755), entry("b", 0o755)],
        };
        let err = select_candidates(&report, Path::new("t"), &Scripted::new(chosen(&[])))
            .unwrap_err();
        assert!(matches!(err, FastbinError::NoCandidatesFound { .. }));

        let err = select_candidates(&report, Path::new("t"), &Scripted::new(chosen(&["zzz"])))
            .unwrap_err();
        assert!(matches!(err, FastbinError::Prompt(_)));
    }

    #[test]
    fn single_mode_rejects_multiple_picks() {
        let report = ScanReport {
            pool: vec![entry("a", 0o644), entry("b", 0o644)],
        };
        let err = select_candidates(&report, Path::new("t"), &Scripted::new(chosen(&["a", "b"])))
            .unwrap_err();
        assert!(matches!(err, FastbinError::Prompt(_)));
    }
}

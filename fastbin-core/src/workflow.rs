// fastbin-core/src/workflow.rs
//! The install pipeline: fetch, classify, scan, select, extract, install, record.
use std::fs;
use std::sync::Arc;

use chrono::Utc;
use fastbin_common::error::Result;
use fastbin_common::{ArtifactKind, Binary, Config, InstallRecord, StagingArea};
use fastbin_net::{verify_checksum, CancellationToken, Fetcher, ProgressReporter};
use tracing::{debug, info, warn};

use crate::archive::{classify, scan_archive};
use crate::install::{extract_entries, promote_binary, Installer};
use crate::select::{select_candidates, Disambiguator};
use crate::store::MetadataStore;

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Hex SHA-256 the downloaded artifact must match before anything is unpacked.
    pub expected_sha256: Option<String>,
}

/// One install invocation. Collaborators are injected so the pipeline can run
/// headless under test.
pub struct InstallWorkflow<'a> {
    staging: StagingArea,
    store: &'a mut MetadataStore,
    disambiguator: &'a dyn Disambiguator,
    fetcher: Fetcher,
    installer: Installer,
    on_fetched: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> InstallWorkflow<'a> {
    pub fn new(
        config: &Config,
        staging: StagingArea,
        store: &'a mut MetadataStore,
        disambiguator: &'a dyn Disambiguator,
        progress: Arc<dyn ProgressReporter>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let installer = Installer::new(config.bin_home())?;
        let fetcher = Fetcher::new(staging.clone(), progress, cancel);
        Ok(Self {
            staging,
            store,
            disambiguator,
            fetcher,
            installer,
            on_fetched: None,
        })
    }

    pub fn with_installer(mut self, installer: Installer) -> Self {
        self.installer = installer;
        self
    }

    /// Called once the download has completed, before anything is unpacked.
    pub fn on_fetched(mut self, hook: impl FnOnce() + 'a) -> Self {
        self.on_fetched = Some(Box::new(hook));
        self
    }

    /// Runs the whole pipeline for `url` and returns the installed binaries.
    ///
    /// Any failure aborts the install. Binaries installed before the failing
    /// one keep their files and records. A binary whose record cannot be
    /// written is removed again.
    pub async fn install(&mut self, url: &str, options: &InstallOptions) -> Result<Vec<Binary>> {
        let mut artifact = self.fetcher.fetch(url).await?;
        if let Some(hook) = self.on_fetched.take() {
            hook();
        }

        if let Some(expected) = &options.expected_sha256 {
            verify_checksum(&artifact.location, expected)?;
            debug!("Checksum of {} verified", artifact.name);
        }

        let staged = match classify(&mut artifact)? {
            ArtifactKind::Binary => vec![promote_binary(&artifact)?],
            ArtifactKind::Archive(codec) => {
                let report = scan_archive(&artifact.location, codec)?;
                let chosen =
                    select_candidates(&report, &artifact.location, self.disambiguator)?;
                let out_dir = self.staging.extraction_dir(&artifact.name)?;
                let binaries = extract_entries(&artifact.location, codec, &chosen, &out_dir)?;
                if let Err(e) = fs::remove_file(&artifact.location) {
                    warn!(
                        "Could not remove archive {}: {}",
                        artifact.location.display(),
                        e
                    );
                }
                binaries
            }
        };

        let mut installed = Vec::with_capacity(staged.len());
        for binary in staged {
            let mut binary = binary.with_source(&artifact.source_url, &artifact.name);
            self.installer.install(&mut binary)?;
            binary.last_updated = Utc::now();
            if let Err(e) = self.store.upsert(&InstallRecord::from(&binary)) {
                warn!(
                    "Could not record {}; removing {}",
                    binary.name,
                    binary.location.display()
                );
                if let Err(rm) = fs::remove_file(&binary.location) {
                    warn!("Could not remove {}: {}", binary.location.display(), rm);
                }
                return Err(e);
            }
            info!(
                "Installed {} to {}",
                binary.name,
                binary.location.display()
            );
            installed.push(binary);
        }
        Ok(installed)
    }
}

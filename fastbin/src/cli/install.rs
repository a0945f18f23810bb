// fastbin/src/cli/install.rs
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use fastbin_common::error::Result;
use fastbin_common::{Config, StagingArea};
use fastbin_core::{InstallOptions, InstallWorkflow};
use fastbin_net::CancellationToken;
use tracing::debug;

use crate::cli::open_store;
use crate::ui::{DialoguerDisambiguator, IndicatifProgress};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// URL of the binary or archive (http, https or file)
    pub url: String,

    /// Expected SHA-256 of the download; the install aborts on mismatch
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,
}

impl InstallArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let staging = StagingArea::create(config.staging_dir())?;
        let mut store = open_store(config)?;

        let cancel = CancellationToken::new();
        let fetched = CancellationToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            let fetched = fetched.clone();
            tokio::spawn(async move {
                tokio::select! {
                    signal = tokio::signal::ctrl_c() => {
                        if signal.is_ok() {
                            debug!("Interrupt received, cancelling download");
                            cancel.cancel();
                        }
                    }
                    _ = fetched.cancelled() => {}
                }
                // Once the handler is installed SIGINT no longer terminates the
                // process on its own.
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("{}: interrupted", "Error".red().bold());
                    std::process::exit(130);
                }
            })
        };

        let disambiguator = DialoguerDisambiguator::new();
        let options = InstallOptions {
            expected_sha256: self.sha256.clone(),
        };
        let result = match InstallWorkflow::new(
            config,
            staging,
            &mut store,
            &disambiguator,
            Arc::new(IndicatifProgress::new()),
            cancel,
        ) {
            Ok(workflow) => {
                let mut workflow = workflow.on_fetched(|| fetched.cancel());
                workflow.install(&self.url, &options).await
            }
            Err(e) => Err(e),
        };
        ctrl_c.abort();

        for binary in result? {
            let version = if binary.version.is_empty() {
                String::new()
            } else {
                format!(" {}", binary.version)
            };
            println!(
                "✓ Installed {}{} -> {}",
                binary.name.green(),
                version,
                binary.location.display()
            );
        }
        Ok(())
    }
}

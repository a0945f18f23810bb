// fastbin/src/cli/remove.rs
use clap::Args;
use colored::Colorize;
use fastbin_common::error::Result;
use fastbin_common::Config;
use fastbin_core::uninstall;

use crate::cli::open_store;

#[derive(Args, Debug)]
pub struct Remove {
    /// Name of the installed binary
    pub name: String,
}

impl Remove {
    pub fn run(&self, config: &Config) -> Result<()> {
        let mut store = open_store(config)?;
        let record = uninstall(&mut store, &self.name)?;
        println!("✓ Removed {} ({})", record.name.green(), record.location);
        Ok(())
    }
}

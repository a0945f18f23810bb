// fastbin/src/cli/info.rs
use clap::Args;
use fastbin_common::error::{FastbinError, Result};
use fastbin_common::Config;

use crate::cli::open_store;

#[derive(Args, Debug)]
pub struct Info {
    /// Name of the installed binary
    pub name: String,
}

impl Info {
    pub fn run(&self, config: &Config) -> Result<()> {
        let store = open_store(config)?;
        let record = store
            .get(&self.name)?
            .ok_or_else(|| FastbinError::NotInstalled(self.name.clone()))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }
}

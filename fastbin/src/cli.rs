// fastbin/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use fastbin_common::error::Result;
use fastbin_common::Config;
use fastbin_core::MetadataStore;

pub mod info;
pub mod install;
pub mod list;
pub mod remove;

use crate::cli::info::Info;
use crate::cli::install::InstallArgs;
use crate::cli::list::List;
use crate::cli::remove::Remove;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "fastbin", bin_name = "fastbin")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a binary or release archive and install it
    #[command(visible_alias = "i")]
    Install(InstallArgs),
    /// List installed binaries
    List(List),
    /// Show the install record of a binary
    Info(Info),
    /// Remove an installed binary
    #[command(visible_alias = "rm")]
    Remove(Remove),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config).await,
            Self::List(command) => command.run(config),
            Self::Info(command) => command.run(config),
            Self::Remove(command) => command.run(config),
        }
    }
}

pub(crate) fn open_store(config: &Config) -> Result<MetadataStore> {
    MetadataStore::open(&config.db_path(), config.db_timeout)
}

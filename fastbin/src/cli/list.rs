// fastbin/src/cli/list.rs
use clap::Args;
use colored::Colorize;
use fastbin_common::error::Result;
use fastbin_common::Config;
use indicatif::HumanBytes;
use prettytable::{format, Cell, Row, Table};

use crate::cli::open_store;

#[derive(Args, Debug)]
pub struct List;

impl List {
    pub fn run(&self, config: &Config) -> Result<()> {
        let store = open_store(config)?;
        let records = store.list()?;
        if records.is_empty() {
            println!("{}", "0 binaries installed".yellow());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Name").style_spec("b"),
            Cell::new("Version").style_spec("b"),
            Cell::new("Platform").style_spec("b"),
            Cell::new("Size").style_spec("b"),
            Cell::new("Updated").style_spec("b"),
            Cell::new("Location").style_spec("b"),
        ]));
        for record in &records {
            let version = if record.version.is_empty() {
                "-"
            } else {
                record.version.as_str()
            };
            table.add_row(Row::new(vec![
                Cell::new(&record.name).style_spec("Fb"),
                Cell::new(version),
                Cell::new(&format!("{}-{}", record.architecture, record.os)),
                Cell::new(&HumanBytes(record.size).to_string()),
                Cell::new(&record.last_updated.format("%Y-%m-%d %H:%M").to_string()),
                Cell::new(&record.location),
            ]));
        }
        table.printstd();
        println!("{}", format!("{} binaries installed", records.len()).bold());
        Ok(())
    }
}

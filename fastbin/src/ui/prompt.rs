// fastbin/src/ui/prompt.rs
use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{MultiSelect, Select};
use fastbin_common::error::{FastbinError, Result};
use fastbin_core::{Disambiguator, Selection, SelectionMode, SelectionRequest};

/// Interactive candidate picker backed by dialoguer menus.
#[derive(Default)]
pub struct DialoguerDisambiguator {
    theme: ColorfulTheme,
}

impl DialoguerDisambiguator {
    pub fn new() -> Self {
        Self::default()
    }
}

fn labels(request: &SelectionRequest) -> Vec<String> {
    request
        .options
        .iter()
        .map(|o| {
            if o.executable {
                format!("{} (executable)", o.name)
            } else {
                o.name.clone()
            }
        })
        .collect()
}

fn prompt_error(err: dialoguer::Error) -> Result<Option<Vec<usize>>> {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        other => Err(FastbinError::Prompt(other.to_string())),
    }
}

impl Disambiguator for DialoguerDisambiguator {
    fn choose(&self, request: &SelectionRequest) -> Result<Selection> {
        let items = labels(request);
        let picked = match request.mode {
            SelectionMode::Single => Select::with_theme(&self.theme)
                .with_prompt(format!(
                    "{} has no obvious executable. Pick the file to install",
                    request.artifact
                ))
                .items(&items)
                .default(0)
                .interact_opt()
                .map(|idx| idx.map(|i| vec![i])),
            SelectionMode::Multiple => MultiSelect::with_theme(&self.theme)
                .with_prompt(format!(
                    "{} contains several executables. Pick the ones to install (space to toggle)",
                    request.artifact
                ))
                .items(&items)
                .interact_opt(),
        };
        let picked = match picked {
            Ok(p) => p,
            Err(e) => prompt_error(e)?,
        };

        Ok(match picked {
            None => Selection::Cancelled,
            Some(indices) => Selection::Chosen(
                indices
                    .into_iter()
                    .filter_map(|i| request.options.get(i).map(|o| o.name.clone()))
                    .collect(),
            ),
        })
    }
}

//! Interactive prompts for missing `generate` arguments

use anyhow::{Context, Result};
use checksum_core::HashAlgorithm;
use colored::Colorize;
use dialoguer::{Input, MultiSelect};
use std::path::PathBuf;

pub const EMPTY_SELECTION: &str = "You must choose at least one algorithm.";

/// Ask for the file to digest
pub fn prompt_file_path() -> Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Please enter the file path")
        .interact_text()
        .context("Failed to read file path")?;

    let path = path.trim().to_string();
    log::info!("User entered file path: {path}");
    Ok(PathBuf::from(path))
}

/// Ask which algorithms to run until at least one is chosen
pub fn prompt_algorithms() -> Result<Vec<HashAlgorithm>> {
    let items: Vec<&str> = HashAlgorithm::ALL.iter().map(|a| a.id()).collect();

    loop {
        let chosen = MultiSelect::new()
            .with_prompt("Select the algorithms to use:")
            .items(&items)
            .interact()
            .context("Failed to read algorithm selection")?;

        match algorithms_from_selection(&chosen) {
            Some(algorithms) => {
                let names: Vec<_> = algorithms.iter().map(|a| a.id()).collect();
                log::info!("User selected algorithms: {}", names.join(", "));
                return Ok(algorithms);
            }
            None => {
                log::warn!("{EMPTY_SELECTION}");
                eprintln!("{}", EMPTY_SELECTION.red());
            }
        }
    }
}

/// Map selected indices to algorithms in menu order; `None` when empty
fn algorithms_from_selection(indices: &[usize]) -> Option<Vec<HashAlgorithm>> {
    let algorithms: Vec<_> = indices
        .iter()
        .filter_map(|&index| HashAlgorithm::ALL.get(index).copied())
        .collect();

    (!algorithms.is_empty()).then_some(algorithms)
}

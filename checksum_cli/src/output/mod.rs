mod formatters;

pub use formatters::{CsvFormatter, JsonFormatter, TextFormatter};

use anyhow::Result;
use checksum_core::{DigestResult, Verification};
use std::path::Path;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Everything a `generate` run produced
#[derive(Debug, Clone, Copy)]
pub struct GenerateReport<'a> {
    pub path: &'a Path,
    pub file_size: u64,
    pub results: &'a [DigestResult],
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the digests of one `generate` run
    fn format_generate(&self, report: &GenerateReport<'_>) -> Result<String>;

    /// Format the outcome of one `verify` run
    fn format_verify(&self, path: &Path, verification: &Verification) -> Result<String>;
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}

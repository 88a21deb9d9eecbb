use super::{GenerateReport, OutputFormatter};
use crate::progress::ColoredPalette;
use anyhow::Result;
use checksum_core::progress::{Palette, PlainPalette, SlotEvent};
use checksum_core::{ProgressBoard, Verification};
use colored::*;
use serde_json::json;
use std::path::Path;

/// Text formatter: the final progress snapshot, as drawn while hashing
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn palette(&self) -> &'static dyn Palette {
        if self.use_color {
            &ColoredPalette
        } else {
            &PlainPalette
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_generate(&self, report: &GenerateReport<'_>) -> Result<String> {
        let algorithms: Vec<_> = report.results.iter().map(|r| r.algorithm).collect();
        let mut board = ProgressBoard::new(report.path, report.file_size, &algorithms);

        for (slot, result) in report.results.iter().enumerate() {
            board.update(slot, SlotEvent::Finalized(result.digest.clone()));
        }

        Ok(board.render_with(self.palette()))
    }

    fn format_verify(&self, path: &Path, verification: &Verification) -> Result<String> {
        let palette = self.palette();
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            palette.heading("File:"),
            palette.detail(&path.display().to_string())
        ));
        output.push_str(&format!(
            "{}: {}\n",
            palette.algorithm(verification.algorithm.display_name()),
            palette.value(&verification.computed.digest)
        ));

        let verdict = if verification.matched {
            let text = "Checksum matches.";
            if self.use_color {
                text.green().bold().to_string()
            } else {
                text.to_string()
            }
        } else {
            let text = "Checksum does not match.";
            if self.use_color {
                text.red().bold().to_string()
            } else {
                text.to_string()
            }
        };
        output.push_str(&verdict);
        output.push('\n');

        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_generate(&self, report: &GenerateReport<'_>) -> Result<String> {
        self.render(&json!({
            "path": report.path.to_string_lossy(),
            "file_size": report.file_size,
            "digests": report.results,
        }))
    }

    fn format_verify(&self, path: &Path, verification: &Verification) -> Result<String> {
        self.render(&json!({
            "path": path.to_string_lossy(),
            "verification": verification,
        }))
    }
}

/// CSV formatter, one row per digest
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn write(headers: &[&str], rows: Vec<Vec<String>>) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(headers)?;
        for row in rows {
            wtr.write_record(row)?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_generate(&self, report: &GenerateReport<'_>) -> Result<String> {
        let path = report.path.to_string_lossy();
        let rows = report
            .results
            .iter()
            .map(|result| {
                vec![
                    path.to_string(),
                    result.algorithm.id().to_string(),
                    result.digest.clone(),
                    report.file_size.to_string(),
                    result.duration.as_millis().to_string(),
                ]
            })
            .collect();

        Self::write(&["path", "algorithm", "digest", "size", "duration_ms"], rows)
    }

    fn format_verify(&self, path: &Path, verification: &Verification) -> Result<String> {
        let row = vec![
            path.to_string_lossy().to_string(),
            verification.algorithm.id().to_string(),
            verification.expected.clone(),
            verification.computed.digest.clone(),
            verification.matched.to_string(),
        ];

        Self::write(
            &["path", "algorithm", "expected", "computed", "matched"],
            vec![row],
        )
    }
}

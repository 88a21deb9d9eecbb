//! Logger setup for the `checksum` binary
//!
//! Console logging stays at `warn` unless `RUST_LOG` or `--debug` says
//! otherwise. A configured log file receives records at the configured level
//! alongside the console.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Logger, Target};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

const CRATES: [&str; 3] = ["checksum", "checksum_core", "checksum_cli"];

/// Console logger plus an optional file logger, each with its own filter
struct DualLogger {
    console: Logger,
    file: Option<Logger>,
}

impl DualLogger {
    fn max_level(&self) -> LevelFilter {
        let file = self.file.as_ref().map_or(LevelFilter::Off, Logger::filter);
        self.console.filter().max(file)
    }
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console.enabled(metadata) || self.file.as_ref().is_some_and(|f| f.enabled(metadata))
    }

    fn log(&self, record: &Record<'_>) {
        self.console.log(record);
        if let Some(file) = &self.file {
            file.log(record);
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            file.flush();
        }
    }
}

/// Initialize the process-wide logger once
pub fn init(debug: bool, config: &LoggingConfig) -> Result<()> {
    let file = match &config.file {
        Some(path) => Some(file_builder(path, debug, config)?.build()),
        None => None,
    };
    let logger = DualLogger {
        console: console_builder(debug).build(),
        file,
    };

    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger)).context("Failed to initialize logging")?;
    log::set_max_level(max_level);

    if debug {
        log::debug!("Debug logging enabled");
    }
    Ok(())
}

fn console_builder(debug: bool) -> Builder {
    if debug {
        let mut builder = Builder::from_env(Env::default());
        builder.filter_level(LevelFilter::Debug);
        for name in CRATES {
            builder.filter_module(name, LevelFilter::Debug);
        }
        builder.format_timestamp_millis();
        builder
    } else {
        Builder::from_env(Env::default().default_filter_or("warn"))
    }
}

fn file_builder(path: &Path, debug: bool, config: &LoggingConfig) -> Result<Builder> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = if debug {
        LevelFilter::Debug
    } else {
        config
            .level
            .parse()
            .with_context(|| format!("Invalid logging.level '{}'", config.level))?
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}]: {}",
                file_timestamp(&buf.timestamp_seconds().to_string()),
                record.level(),
                record.args()
            )
        });
    for name in CRATES {
        builder.filter_module(name, level);
    }
    Ok(builder)
}

/// `2024-05-01T10:20:30Z` as `2024-05-01 10:20:30`
fn file_timestamp(rfc3339: &str) -> String {
    rfc3339.trim_end_matches('Z').replacen('T', " ", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_timestamp_layout() {
        assert_eq!(file_timestamp("2024-05-01T10:20:30Z"), "2024-05-01 10:20:30");
    }

    #[test]
    fn test_file_builder_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("checksum.log");
        let config = LoggingConfig {
            level: "info".to_string(),
            file: Some(path.clone()),
        };

        file_builder(&path, false, &config).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_builder_rejects_bad_level() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("checksum.log");
        let config = LoggingConfig {
            level: "chatty".to_string(),
            file: Some(path.clone()),
        };

        assert!(file_builder(&path, false, &config).is_err());
    }

    #[test]
    fn test_records_reach_console_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let console_path = dir.path().join("console.log");
        let file_path = dir.path().join("checksum.log");
        let config = |path: &Path, level: &str| LoggingConfig {
            level: level.to_string(),
            file: Some(path.to_path_buf()),
        };

        // Stand in for stderr with a warn-level sink
        let logger = DualLogger {
            console: file_builder(&console_path, false, &config(&console_path, "warn"))
                .unwrap()
                .build(),
            file: Some(
                file_builder(&file_path, false, &config(&file_path, "debug"))
                    .unwrap()
                    .build(),
            ),
        };
        assert_eq!(logger.max_level(), LevelFilter::Debug);

        for (level, message) in [
            (log::Level::Warn, "interrupted"),
            (log::Level::Debug, "terminal capabilities"),
        ] {
            logger.log(
                &Record::builder()
                    .target("checksum")
                    .level(level)
                    .args(format_args!("{message}"))
                    .build(),
            );
        }
        logger.flush();

        let console = fs::read_to_string(&console_path).unwrap();
        assert!(console.contains("[WARN]: interrupted"));
        assert!(!console.contains("terminal capabilities"));

        let file = fs::read_to_string(&file_path).unwrap();
        assert!(file.contains("[WARN]: interrupted"));
        assert!(file.contains("[DEBUG]: terminal capabilities"));
    }
}

use checksum_cli::config::{AppConfig, ConfigManager, get_config, split_algorithm_list};
use checksum_cli::error::{CliError, CliResult, ErrorContext, ExitCode};
use checksum_cli::output::{GenerateReport, OutputFormat, create_formatter};
use checksum_cli::progress::{
    ChannelProvider, ColoredPalette, ProgressRenderer, create_progress_infrastructure,
    render_progress,
};
use checksum_cli::terminal::Capabilities;
use checksum_cli::{logging, prompt};
use checksum_core::error::ValidationError;
use checksum_core::{
    CancellationFlag, ChecksumClient, Error as CoreError, HashAlgorithm, ProgressBoard,
    StrategyKind,
};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(name = "checksum")]
#[command(author, version, long_about = None)]
#[command(about = "Streaming multi-algorithm file checksums with live progress")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute checksums of a file
    Generate {
        /// File to hash (prompted for when omitted)
        file: Option<PathBuf>,

        /// Algorithms: sha1, sha256, sha384, sha512, md5 (space or comma separated)
        algorithms: Vec<String>,

        #[command(flatten)]
        hashing: HashingArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check a file against an expected checksum
    Verify {
        /// File to hash
        file: PathBuf,

        /// Expected checksum in hex, any case
        checksum: String,

        /// Algorithm the checksum was made with
        algorithm: String,

        #[command(flatten)]
        hashing: HashingArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct HashingArgs {
    /// Scheduling of the digest passes: sequential, multiple, parallel
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Bytes read per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Disable live progress display
    #[arg(long)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., hashing.chunk_size)
        key: String,
    },

    /// Set a configuration value in the user file
    Set {
        /// Configuration key (e.g., hashing.strategy)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all effective configuration values
    List,

    /// Show where configuration is read from
    Path,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let debug = cli.debug;

    match run(cli).await {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            eprint!("{}", error.format_for_user(debug));
            error.exit_code().into()
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = get_config().map_err(|e| {
        CliError::misuse(&format!("{e:#}"))
            .with_suggestion("Run 'checksum config path' to find the files being read")
    })?;
    logging::init(cli.debug, &config.logging)?;

    let caps = Capabilities::detect();
    if !config.output.color_enabled || !caps.supports_ansi() {
        colored::control::set_override(false);
    }
    log::debug!("Terminal capabilities: {caps:?}");

    match cli.command {
        Commands::Generate {
            file,
            algorithms,
            hashing,
            format,
        } => generate_command(config, &caps, file, algorithms, hashing, format).await,
        Commands::Verify {
            file,
            checksum,
            algorithm,
            hashing,
            format,
        } => verify_command(config, &caps, file, checksum, algorithm, hashing, format).await,
        Commands::Config { command } => config_command(command),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Client for one command, cancelled on Ctrl-C
fn build_client(config: &mut AppConfig, hashing: &HashingArgs) -> CliResult<ChecksumClient> {
    config
        .apply_cli_overrides(hashing.chunk_size, hashing.strategy)
        .map_err(|e| CliError::misuse(&format!("{e:#}")))?;

    let flag = CancellationFlag::new();
    let signal_flag = flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping digest passes");
            signal_flag.cancel();
        }
    });

    Ok(ChecksumClient::new(config.client_config())?.with_cancellation(flag))
}

fn start_renderer(
    config: &AppConfig,
    caps: &Capabilities,
    hashing: &HashingArgs,
) -> (ChannelProvider, JoinHandle<Option<ProgressBoard>>) {
    let live = !hashing.no_progress && config.output.progress_enabled && caps.shows_live_progress();
    let (provider, rx) = create_progress_infrastructure();
    let handle = tokio::spawn(render_progress(rx, ProgressRenderer::new(live)));
    (provider, handle)
}

async fn finish_renderer(
    handle: JoinHandle<Option<ProgressBoard>>,
) -> CliResult<Option<ProgressBoard>> {
    handle
        .await
        .map_err(|e| CliError::general(&format!("Progress renderer failed: {e}")))
}

/// Show how far a failed session got
fn report_partial(board: Option<&ProgressBoard>) {
    if let Some(board) = board {
        eprintln!("{}\n", board.render_with(&ColoredPalette));
    }
}

fn resolve_algorithms(
    config: &AppConfig,
    caps: &Capabilities,
    names: &[String],
) -> CliResult<Vec<HashAlgorithm>> {
    let names: Vec<String> = names
        .iter()
        .flat_map(|name| split_algorithm_list(name))
        .collect();

    if !names.is_empty() {
        return Ok(HashAlgorithm::parse_list(&names)?);
    }
    if !config.hashing.default_algorithms.is_empty() {
        log::debug!(
            "Using default algorithms: {}",
            config.hashing.default_algorithms.join(", ")
        );
        return Ok(HashAlgorithm::parse_list(&config.hashing.default_algorithms)?);
    }
    if caps.can_prompt() {
        return Ok(prompt::prompt_algorithms()?);
    }

    Err(CoreError::Validation(ValidationError::NoAlgorithms).into())
}

async fn generate_command(
    mut config: AppConfig,
    caps: &Capabilities,
    file: Option<PathBuf>,
    algorithms: Vec<String>,
    hashing: HashingArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let file = match file {
        Some(file) => file,
        None if caps.can_prompt() => prompt::prompt_file_path()?,
        None => {
            return Err(CliError::misuse("No file given")
                .with_suggestion("Pass the file to hash: checksum generate <FILE>"));
        }
    };
    let algorithms = resolve_algorithms(&config, caps, &algorithms)?;
    let client = build_client(&mut config, &hashing)?;

    let (provider, renderer) = start_renderer(&config, caps, &hashing);
    let outcome = client.generate(&file, &algorithms, &provider).await;
    drop(provider);
    let board = finish_renderer(renderer).await?;

    let results = match outcome {
        Ok(results) => results,
        Err(error) => {
            report_partial(board.as_ref());
            return Err(error.into());
        }
    };

    let file_size = board
        .as_ref()
        .map(ProgressBoard::total_bytes)
        .or_else(|| results.first().map(|r| r.input_size))
        .unwrap_or(0);
    let report = GenerateReport {
        path: &file,
        file_size,
        results: &results,
    };

    let formatter = create_formatter(format, caps.supports_ansi() && config.output.color_enabled);
    println!("{}", formatter.format_generate(&report)?.trim_end());
    Ok(())
}

async fn verify_command(
    mut config: AppConfig,
    caps: &Capabilities,
    file: PathBuf,
    checksum: String,
    algorithm: String,
    hashing: HashingArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let client = build_client(&mut config, &hashing)?;

    let (provider, renderer) = start_renderer(&config, caps, &hashing);
    let outcome = client
        .verify_from_names(&file, &checksum, &algorithm, &provider)
        .await;
    drop(provider);
    let board = finish_renderer(renderer).await?;

    let verification = match outcome {
        Ok(verification) => verification,
        Err(error) => {
            report_partial(board.as_ref());
            return Err(error.into());
        }
    };

    let formatter = create_formatter(format, caps.supports_ansi() && config.output.color_enabled);
    println!("{}", formatter.format_verify(&file, &verification)?.trim_end());

    if verification.matched {
        Ok(())
    } else {
        Err(CliError::mismatch(
            verification.expected.trim(),
            &verification.computed.digest,
        ))
    }
}

fn config_command(command: ConfigCommand) -> CliResult<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            let value = manager
                .get(&key)
                .map_err(|e| CliError::misuse(&format!("{e:#}")))?;
            println!("{value}");
        }
        ConfigCommand::Set { key, value } => {
            manager
                .set(&key, &value)
                .map_err(|e| CliError::misuse(&format!("{e:#}")).with_context("key", &key))?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;

            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());
            eprintln!();

            let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (key, value) in items {
                let (section, field) = key.split_once('.').unwrap_or(("general", key.as_str()));
                sections
                    .entry(section.to_string())
                    .or_default()
                    .push((field.to_string(), value));
            }

            for (section, items) in sections {
                println!("[{}]", section.yellow());
                for (key, value) in items {
                    println!("  {} = {}", key.cyan(), value);
                }
                println!();
            }
        }
        ConfigCommand::Path => {
            let user = manager.get_config_path();
            let state = if user.exists() {
                ""
            } else {
                " (not created yet)"
            };
            println!("user: {}{state}", user.display());
            match manager.project_path() {
                Some(project) => println!("project: {}", project.display()),
                None => println!("project: none"),
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

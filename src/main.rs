//! linediff: line and character level text diff with move detection
//!
//! Speaks a one-request JSON protocol over stdin/stdout and also diffs files
//! directly.

#![allow(clippy::struct_excessive_bools)]

use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use linediff::{
    cli::{self, DiffPaths},
    config::{AppConfig, ConfigOverrides, ConfigPreset},
    pipeline::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linediff")]
#[command(version)]
#[command(about = "Line and character level text diff with move detection", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Error occurred (a failure response was written)
    2  Changes detected with --fail-on-change

EXAMPLES:
    # Answer one JSON request
    echo '{\"original\": \"a\\n\", \"modified\": \"b\\n\"}' | linediff stdio

    # Diff two files, human-readable
    linediff diff old.txt new.txt -o summary

    # Detect moved blocks, ignoring indentation
    linediff diff old.rs new.rs --compute-moves --ignore-trim-whitespace

    # Many requests, one per line
    linediff batch < requests.ndjson > responses.ndjson")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a named preset (default, whitespace-insensitive, moves, fast)
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Diff options shared by every diffing command.
///
/// A flag that is given replaces the configured value, even when it sets
/// the default; options inside a request replace both.
#[derive(Args)]
struct OptionArgs {
    /// Ignore leading and trailing whitespace when comparing lines
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    ignore_trim_whitespace: Option<bool>,

    /// Report relocated blocks as moves
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    compute_moves: Option<bool>,

    /// Time budget per diff in milliseconds (0 expires immediately)
    #[arg(long, value_name = "MS")]
    max_computation_time_ms: Option<u64>,

    /// Exit with code 2 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,

    /// Skip checking results against their inputs
    #[arg(long)]
    no_validate: bool,
}

/// Arguments for the `diff` subcommand
#[derive(Args)]
struct DiffArgs {
    /// Path to the original file
    original: PathBuf,

    /// Path to the modified file
    modified: PathBuf,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one JSON request from stdin with one JSON response on stdout
    Stdio(OptionArgs),

    /// Diff two files
    Diff(DiffArgs),

    /// Answer newline-delimited JSON requests, one response per line
    Batch(OptionArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the discovered config file
    Path,
    /// Generate an example .linediff.yaml in the current directory
    Init,
    /// List the named presets
    Presets,
}

// ============================================================================
// Configuration layering
// ============================================================================

/// CLI flags as the top config layer.
fn cli_overrides(cli: &Cli, options: &OptionArgs) -> linediff::Result<ConfigOverrides> {
    let preset = cli.preset.as_deref().map(ConfigPreset::parse).transpose()?;
    Ok(ConfigOverrides {
        preset,
        ignore_trim_whitespace: options.ignore_trim_whitespace,
        compute_moves: options.compute_moves,
        max_computation_time_ms: options.max_computation_time_ms,
        fail_on_change: options.fail_on_change.then_some(true),
        quiet: cli.quiet.then_some(true),
        validate_results: options.no_validate.then_some(false),
        ..ConfigOverrides::default()
    })
}

fn effective_config(cli: &Cli, overrides: &ConfigOverrides) -> linediff::Result<AppConfig> {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), overrides)?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    Ok(config)
}

/// Config for the JSON protocol commands, which answer even when it fails.
fn protocol_config(cli: &Cli, options: &OptionArgs) -> linediff::Result<AppConfig> {
    effective_config(cli, &cli_overrides(cli, options)?)
}

/// Answer a configuration failure with a failure response on stdout.
fn reject(err: &linediff::LineDiffError) -> Result<()> {
    tracing::error!("{err}");
    let code = cli::write_failure(io::stdout().lock(), err)?;
    exit_with(code)
}

fn exit_with(code: i32) -> Result<()> {
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON protocol
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match &cli.command {
        Commands::Stdio(options) => match protocol_config(&cli, options) {
            Ok(config) => {
                let code = cli::run_stdio(io::stdin().lock(), io::stdout().lock(), &config)?;
                exit_with(code)
            }
            Err(err) => reject(&err),
        },

        Commands::Batch(options) => match protocol_config(&cli, options) {
            Ok(config) => {
                let code = cli::run_batch(io::stdin().lock(), io::stdout().lock(), &config)?;
                exit_with(code)
            }
            Err(err) => reject(&err),
        },

        Commands::Diff(args) => {
            let overrides = ConfigOverrides {
                output_format: args.output,
                output_file: args.output_file.clone(),
                pretty: args.pretty.then_some(true),
                ..cli_overrides(&cli, &args.options)?
            };

            let config = effective_config(&cli, &overrides)?;
            let paths = DiffPaths {
                original: args.original.clone(),
                modified: args.modified.clone(),
            };
            let code = cli::run_diff(&paths, &config)?;
            exit_with(code)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "linediff", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema =
                linediff::config::generate_json_schema().context("failed to generate schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    linediff::config::load_or_default(cli.config.as_deref())?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                match linediff::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => println!("{}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".linediff.yaml");
                if target.exists() {
                    bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = linediff::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
            ConfigAction::Presets => {
                for preset in ConfigPreset::all() {
                    println!("{:<24} {}", preset.name(), preset.description());
                }
                Ok(())
            }
        },
    }
}

// vincheck CLI - resolve VINs and compare them against reference data

mod batch;
mod decode;
mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vincheck_config::{ConfigError, LoadedSettings, Settings};
use vincheck_decode::{RemoteResolver, RetryPolicy};

use exit_codes::{
    EXIT_CONFIG_INVALID, EXIT_CONFIG_NOT_FOUND, EXIT_ERROR, EXIT_IO, EXIT_REMOTE_CLIENT,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "vincheck")]
#[command(about = "Resolve VINs and check them against reference vehicle data")]
#[command(version)]
struct Cli {
    /// Settings file (TOML). Defaults to <config dir>/vincheck/settings.toml
    #[arg(long, global = true, env = "VINCHECK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one VIN (prompts when none is given)
    #[command(after_help = "\
Examples:
  vincheck decode 1HGCV1F34KA123456
  vincheck decode 1HGCV1F34KA123456 --json
  vincheck decode")]
    Decode {
        /// VIN to resolve
        vin: Option<String>,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve and compare every VIN in a reference dataset
    #[command(after_help = "\
Examples:
  vincheck batch vehicle_simple_info.json
  vincheck batch vehicle_simple_info.json --out-dir results --limit 20
  vincheck batch vehicle_simple_info.json --json > summary.json")]
    Batch {
        /// Reference dataset: JSON object keyed by VIN
        reference: PathBuf,

        /// Directory for the result files (overrides batch.output_dir)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Print summary and verdicts as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Only process the first N VINs
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Print the effective settings as TOML
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = Settings::load(cli.config.as_deref()).map_err(CliError::config)?;
    tracing::debug!(source = %loaded.source, "effective settings");

    match cli.command {
        None => decode::cmd_decode(None, false, &loaded.settings),
        Some(Commands::Decode { vin, json }) => decode::cmd_decode(vin, json, &loaded.settings),
        Some(Commands::Batch {
            reference,
            out_dir,
            json,
            limit,
        }) => batch::cmd_batch(
            batch::BatchArgs {
                reference,
                out_dir,
                json,
                limit,
            },
            &loaded.settings,
        ),
        Some(Commands::Config) => cmd_config(&loaded),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Build the remote client from settings.
pub(crate) fn remote_resolver(settings: &Settings) -> Result<RemoteResolver, CliError> {
    let policy = RetryPolicy {
        timeout: settings.remote.timeout(),
        max_retries: settings.remote.max_retries,
        retry_delay: settings.remote.retry_delay(),
    };
    RemoteResolver::with_base_url(&settings.remote.base_url, policy)
        .map_err(|e| CliError::new(EXIT_REMOTE_CLIENT, e.to_string()))
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(loaded: &LoadedSettings) -> Result<(), CliError> {
    let text = loaded
        .settings
        .to_toml()
        .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    println!("# source: {}", loaded.source);
    print!("{}", text);
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn config(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound(_) => Self::new(EXIT_CONFIG_NOT_FOUND, err.to_string())
                .with_hint("check --config or the VINCHECK_CONFIG environment variable"),
            other => Self::new(EXIT_CONFIG_INVALID, other.to_string())
                .with_hint(
                    "keys: [remote] base_url, timeout_secs, max_retries, retry_delay_ms; \
                     [matching] displacement_tolerance_l; [batch] inter_vin_delay_ms, output_dir",
                ),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

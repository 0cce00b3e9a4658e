use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{CommandFactory, Parser};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stfind::{compare, CompareRequest, Config, EntryFilter, Reporter, StfindError, SyncthingClient, Terminator};

/// A Syncthing '.stignore' version of find: prints local paths Syncthing does not know about.
///
/// Only works against the Syncthing instance on this machine, since it compares
/// Syncthing's index with the filesystem Syncthing itself sees.
#[derive(Parser)]
#[command(name = "stfind")]
#[command(version)]
struct Cli {
    /// The folder ID to check for ignores, as shown in the Syncthing GUI
    #[arg(long = "folderid", value_parser = NonEmptyStringValueParser::new())]
    folder_id: String,

    /// The API key shown in the Syncthing GUI (falls back to service.api_key in the config file)
    #[arg(long = "apikey")]
    api_key: Option<String>,

    /// Syncthing URL [default: http://localhost:8384]. Do not point this at a remote Syncthing
    #[arg(long)]
    url: Option<String>,

    /// NUL-terminate records, for xargs -0 and names containing newlines
    #[arg(long)]
    print0: bool,

    /// Only output directories, not files
    #[arg(long = "dirsonly", conflicts_with = "files_only")]
    dirs_only: bool,

    /// Only output files, not directories
    #[arg(long = "filesonly")]
    files_only: bool,

    /// Include .stfolder, .stignore and versions entries. Do NOT act on the output with this enabled
    #[arg(long = "showallconfig")]
    show_all_config: bool,

    /// List Syncthing entries missing on disk instead (debugging only)
    #[arg(long, hide = true)]
    reverse: bool,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<StfindError>()
                .map(|e| e.kind().exit_code())
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    init_logging(cli.verbose, &config.logging.level)?;
    info!("Starting stfind v{}", env!("CARGO_PKG_VERSION"));

    let api_key = match cli.api_key.or_else(|| config.service.api_key.clone()) {
        Some(key) if !key.is_empty() => key,
        _ => Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "Missing --apikey. See the Syncthing GUI.",
            )
            .exit(),
    };
    let url = cli.url.unwrap_or_else(|| config.service.url.clone());

    let request = CompareRequest {
        folder_id: cli.folder_id,
        filter: EntryFilter::from_flags(cli.dirs_only, cli.files_only)?,
        show_admin: cli.show_all_config || config.output.show_all_config,
        reverse: cli.reverse,
    };

    let client = SyncthingClient::new(&url, &api_key);
    debug!("Using Syncthing at {}", client.base_url());

    let report = compare(&client, &request).await?;

    let terminator = Terminator::from_print0(cli.print0 || config.output.print0);
    let mut reporter = Reporter::new(io::stdout().lock(), terminator);
    let written = reporter
        .emit(&report.missing)
        .context("Failed to write report to stdout")?;

    debug!(
        "Reported {} of {} local entries ({} known to Syncthing)",
        written, report.local_entries, report.remote_entries
    );
    Ok(())
}

/// Initialize logging on stderr; stdout carries only the report
fn init_logging(verbose: bool, configured_level: &str) -> Result<()> {
    let default_level = if verbose { "debug" } else { configured_level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}

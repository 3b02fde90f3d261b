//! Pomodoro History CLI - a terminal Pomodoro timer with a session log
//!
//! - `run`: time a session in the foreground; finished sessions are saved
//! - `history`: list saved sessions and chart them on a timeline

use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::warn;

use pomodoro_history::cli::{self, Cli, Commands, Display};
use pomodoro_history::config::{ConfigError, ConfigStore, FileConfigStore};
use pomodoro_history::session::StoreError;
use pomodoro_history::sound::SoundError;
use pomodoro_history::timer::{Clock, SystemClock};
use pomodoro_history::types::PomodoroConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        if let Some(hint) = suggestion_for(&e) {
            Display::show_hint(hint);
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            let config = args.apply(load_config(args.config.as_deref())?);
            config.validate()?;
            cli::run_session(&config, args.start).await?;
        }
        Some(Commands::History(args)) => {
            let config = if args.demo || args.data_dir.is_some() {
                PomodoroConfig::default()
            } else {
                load_config(None)?
            };
            cli::show_history(&args, &config, SystemClock.now_ms())?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Loads the configuration file, falling back to defaults when the platform
/// has no config directory.
fn load_config(path: Option<&Path>) -> Result<PomodoroConfig> {
    let store = match path {
        Some(path) => FileConfigStore::new(path),
        None => match FileConfigStore::at_default_location() {
            Ok(store) => store,
            Err(e) => {
                warn!("{}, using defaults", e);
                return Ok(PomodoroConfig::default());
            }
        },
    };

    store
        .load()
        .with_context(|| format!("設定ファイルを読み込めません: {}", store.path().display()))
}

/// Returns the library's suggestion for a known error type.
fn suggestion_for(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.suggestion())
        } else if let Some(e) = cause.downcast_ref::<StoreError>() {
            Some(e.suggestion())
        } else {
            cause.downcast_ref::<SoundError>().map(SoundError::suggestion)
        }
    })
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

//! Command definitions for the Pomodoro CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::types::PomodoroConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro CLI - a terminal timer that keeps a history of every session
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-history",
    version,
    about = "セッション履歴を記録するポモドーロタイマー",
    long_about = "ターミナル上で動作するポモドーロタイマー。\n\
                  完了したセッションを保存し、履歴をタイムラインで表示します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive session timer in the foreground
    Run(RunArgs),

    /// Show stored sessions as a list and a timeline
    History(HistoryArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Session duration in minutes (1-120), overrides the config file
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub minutes: Option<u32>,

    /// Start counting immediately instead of waiting for `s`
    #[arg(short, long)]
    pub start: bool,

    /// Disable the completion sound
    #[arg(long, conflicts_with = "sound_file")]
    pub no_sound: bool,

    /// Audio file played on completion (wav, ogg, mp3, flac)
    #[arg(long, value_parser = validate_sound_file)]
    pub sound_file: Option<PathBuf>,

    /// Directory holding sessions.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn apply(&self, mut config: PomodoroConfig) -> PomodoroConfig {
        if let Some(minutes) = self.minutes {
            config.work_minutes = minutes;
        }
        if self.no_sound {
            config.sound = false;
        }
        if let Some(path) = &self.sound_file {
            config.sound = true;
            config.sound_file = Some(path.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        config
    }
}

// ============================================================================
// History Command Arguments
// ============================================================================

/// Arguments for the history command
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Show generated sample sessions instead of stored ones
    #[arg(long)]
    pub demo: bool,

    /// Directory holding sessions.json
    #[arg(long, conflicts_with = "demo")]
    pub data_dir: Option<PathBuf>,

    /// Only show sessions of this day (YYYY-MM-DD), charted 08:00-20:00
    #[arg(long)]
    pub day: Option<NaiveDate>,

    /// Timeline width in columns (10-200)
    #[arg(
        short,
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u16).range(10..=200)
    )]
    pub width: u16,
}

impl Default for HistoryArgs {
    fn default() -> Self {
        Self {
            demo: false,
            data_dir: None,
            day: None,
            width: 60,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the sound file argument.
///
/// - Must exist
/// - Must have a supported extension
fn validate_sound_file(s: &str) -> Result<PathBuf, String> {
    crate::sound::SoundSource::file_validated(s)
        .map(|_| PathBuf::from(s))
        .map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["pomodoro-history"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["pomodoro-history", "-v", "history"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_verbose_after_subcommand() {
            let cli = Cli::parse_from(["pomodoro-history", "run", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::parse_from(["pomodoro-history", "completions", "bash"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Run Command Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["pomodoro-history", "run"]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert!(args.minutes.is_none());
                    assert!(!args.start);
                    assert!(!args.no_sound);
                    assert!(args.sound_file.is_none());
                    assert!(args.data_dir.is_none());
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_options() {
            let cli = Cli::parse_from([
                "pomodoro-history",
                "run",
                "-m",
                "50",
                "--start",
                "--no-sound",
                "--data-dir",
                "/tmp/history",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.minutes, Some(50));
                    assert!(args.start);
                    assert!(args.no_sound);
                    assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/history")));
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_minutes_out_of_range() {
            assert!(Cli::try_parse_from(["pomodoro-history", "run", "-m", "0"]).is_err());
            assert!(Cli::try_parse_from(["pomodoro-history", "run", "-m", "121"]).is_err());
        }

        #[test]
        fn test_missing_sound_file_rejected() {
            let result = Cli::try_parse_from([
                "pomodoro-history",
                "run",
                "--sound-file",
                "/nonexistent/bell.wav",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_apply_overrides() {
            let args = RunArgs {
                minutes: Some(10),
                no_sound: true,
                data_dir: Some(PathBuf::from("/data")),
                ..RunArgs::default()
            };
            let config = args.apply(PomodoroConfig::default());

            assert_eq!(config.work_minutes, 10);
            assert!(!config.sound);
            assert_eq!(config.data_dir, Some(PathBuf::from("/data")));
        }

        #[test]
        fn test_apply_keeps_config_values() {
            let base = PomodoroConfig::default().with_work_minutes(40).with_sound(false);
            let config = RunArgs::default().apply(base.clone());
            assert_eq!(config, base);
        }
    }

    // ------------------------------------------------------------------------
    // History Command Tests
    // ------------------------------------------------------------------------

    mod history_args_tests {
        use super::*;

        #[test]
        fn test_parse_history_defaults() {
            let cli = Cli::parse_from(["pomodoro-history", "history"]);
            match cli.command {
                Some(Commands::History(args)) => {
                    assert!(!args.demo);
                    assert_eq!(args.width, 60);
                    assert!(args.day.is_none());
                }
                _ => panic!("Expected History command"),
            }
        }

        #[test]
        fn test_parse_history_day() {
            let cli = Cli::parse_from(["pomodoro-history", "history", "--day", "2024-03-14"]);
            match cli.command {
                Some(Commands::History(args)) => {
                    assert_eq!(args.day, NaiveDate::from_ymd_opt(2024, 3, 14));
                }
                _ => panic!("Expected History command"),
            }
        }

        #[test]
        fn test_demo_conflicts_with_data_dir() {
            let result = Cli::try_parse_from([
                "pomodoro-history",
                "history",
                "--demo",
                "--data-dir",
                "/tmp",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_width_out_of_range() {
            assert!(Cli::try_parse_from(["pomodoro-history", "history", "-w", "5"]).is_err());
        }
    }
}

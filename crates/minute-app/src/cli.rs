//! CLI argument definitions for the Minute application.
//!
//! Uses `clap` with derive macros. Priority resolution: CLI args > env vars
//! > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Minute — a meeting memory engine: transcribe, chunk, index, and ask.
#[derive(Parser, Debug)]
#[command(name = "minute", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk a transcript segments file (JSON array) and print chunk stats.
    Chunk {
        /// Path to a JSON file with [{text, start, end, speaker}, ...].
        file: PathBuf,
    },
    /// Print the retrieval plan the planner chooses for a query.
    Plan {
        /// The query to plan for.
        query: String,
    },
    /// Interactive single-session chat over stdin.
    Chat,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MINUTE_CONFIG env var > ~/.minute/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("MINUTE_CONFIG") {
            return PathBuf::from(p);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".minute").join("config.toml");
        }
        PathBuf::from("config.toml")
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flag_wins() {
        let args = CliArgs {
            config: None,
            log_level: Some("debug".to_string()),
            command: Command::Chat,
        };
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs {
            config: None,
            log_level: None,
            command: Command::Chat,
        };
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs {
            config: Some(PathBuf::from("/tmp/custom.toml")),
            log_level: None,
            command: Command::Chat,
        };
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/custom.toml"));
    }
}

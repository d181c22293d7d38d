//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a load profile against the configured store
    Run {
        /// Profile to run: load, stress, spike, volume or endurance
        #[arg(value_name = "PROFILE")]
        profile: String,

        /// Write the run summary as JSON to this path
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// List the available profiles
    List,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file to validate
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path (prints to stdout when omitted)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output file if it already exists
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_profile_and_out() {
        let cli = Cli::parse_from(["stampede", "run", "spike", "--out", "summary.json"]);
        match cli.command {
            Some(Commands::Run { profile, out }) => {
                assert_eq!(profile, "spike");
                assert_eq!(out, Some(PathBuf::from("summary.json")));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_global_flags_apply_to_subcommands() {
        let cli = Cli::parse_from(["stampede", "list", "--config", "suite.yaml", "--log-level", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("suite.yaml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Commands::List)));
    }
}

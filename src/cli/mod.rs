//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for hl7bridge using clap.

pub mod commands;

use crate::config::{load_config, load_config_str, BridgeConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "hl7bridge.toml";

/// hl7bridge - HL7v2 to FHIR Patient converter
#[derive(Parser, Debug)]
#[command(name = "hl7bridge")]
#[command(version, about, long_about = None)]
#[command(author = "hl7bridge Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "HL7BRIDGE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HL7BRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert HL7v2 messages to FHIR Patient resources
    Convert(commands::convert::ConvertArgs),

    /// Query the FHIR server for patients within an age range
    Patients(commands::patients::PatientsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Loads the configuration file, or built-in defaults when it does not exist
///
/// Environment overrides apply in both cases.
pub fn load_or_default(path: &str) -> Result<BridgeConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        load_config_str("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["hl7bridge", "convert", "adt.hl7"]);
        assert_eq!(cli.config, "hl7bridge.toml");
        assert!(matches!(cli.command, Commands::Convert(_)));
    }

    #[test]
    fn test_cli_parse_convert_requires_files() {
        assert!(Cli::try_parse_from(["hl7bridge", "convert"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["hl7bridge", "--config", "custom.toml", "init"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["hl7bridge", "--log-level", "debug", "convert", "a.hl7"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_patients() {
        let cli = Cli::parse_from(["hl7bridge", "patients", "--min-age", "18", "--max-age", "65"]);
        match cli.command {
            Commands::Patients(args) => {
                assert_eq!(args.min_age, Some(18));
                assert_eq!(args.max_age, Some(65));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["hl7bridge", "validate-config", "--check-connection"]);
        assert!(matches!(
            cli.command,
            Commands::ValidateConfig(commands::validate::ValidateArgs {
                check_connection: true
            })
        ));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["hl7bridge", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let config = load_or_default(missing.to_str().unwrap()).unwrap();
        assert_eq!(config.submit.max_concurrency, 4);
    }
}

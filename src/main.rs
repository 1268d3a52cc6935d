// hl7bridge - HL7v2 to FHIR Patient Converter
// Copyright (c) 2025 hl7bridge Contributors
// Licensed under the MIT License

use clap::Parser;
use hl7bridge::cli::commands::{EXIT_CONFIG, EXIT_FATAL};
use hl7bridge::cli::{load_or_default, Cli, Commands};
use hl7bridge::config::{BridgeConfig, LoggingConfig};
use hl7bridge::domain::{BridgeError, Result};
use hl7bridge::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Optional; a missing .env is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // validate-config reports load failures itself
    let config = load_or_default(&cli.config);

    let (log_level, logging_config) = match &config {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "hl7bridge - HL7v2 to FHIR Patient converter"
    );

    let exit_code = match execute_command(&cli, config).await {
        Ok(code) => code,
        Err(e) => {
            hl7bridge::log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e:#}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Result<BridgeConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Convert(args) => match config {
            Ok(config) => args.execute(config).await,
            Err(e) => Ok(config_error(cli, &e)),
        },
        Commands::Patients(args) => match config {
            Ok(config) => args.execute(config).await,
            Err(e) => Ok(config_error(cli, &e)),
        },
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

fn config_error(cli: &Cli, error: &BridgeError) -> i32 {
    tracing::error!(error = %error, config_path = %cli.config, "Failed to load configuration");
    eprintln!("{error}");
    EXIT_CONFIG
}

//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the hl7bridge configuration file.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_OK};
use crate::adapters::fhir::{check_connection, connect};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also run a health check against the FHIR server
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // Loading runs validation as its last step
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration is valid");
                c
            }
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  FHIR Server: {}", config.fhir.base_url);
        println!("  Auth Type: {}", config.fhir.auth_type);
        println!("  TLS Verify: {}", config.fhir.tls_verify);
        println!("  Max Retries: {}", config.fhir.retry.max_retries);
        println!(
            "  Search Paging: {} per page, {} pages max",
            config.fhir.search.page_size, config.fhir.search.max_pages
        );
        println!(
            "  Identifier: {} ({})",
            config.conversion.identifier_strategy, config.conversion.identifier_system
        );
        println!("  Max Concurrency: {}", config.submit.max_concurrency);
        println!();

        if !self.check_connection {
            return Ok(EXIT_OK);
        }

        let server = match connect(&config.fhir) {
            Ok(server) => server,
            Err(e) => {
                println!("Failed to create FHIR client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match check_connection(server.as_ref()).await {
            Ok(()) => {
                println!("FHIR server reachable: {}", server.base_url());
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("FHIR server unreachable: {}", server.base_url());
                println!("   Error: {e}");
                Ok(EXIT_CONNECTION)
            }
        }
    }
}

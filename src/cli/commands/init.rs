//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::cli::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Include explanations for every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set fhir.base_url to your FHIR server");
                println!("  2. For authenticated servers, set HL7BRIDGE_FHIR_PASSWORD or");
                println!("     HL7BRIDGE_FHIR_TOKEN in a .env file");
                println!("  3. Validate: hl7bridge validate-config --check-connection");
                println!("  4. Convert: hl7bridge convert message.hl7 --post");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# hl7bridge configuration

environment = "development"

[application]
log_level = "info"
dry_run = false

[fhir]
base_url = "https://hapi.fhir.org/baseR4/"
auth_type = "none"
tls_verify = true
timeout_seconds = 30

[conversion]
identifier_strategy = "fixed"
identifier_system = "urn:example:patient-identifier"
identifier_value = "1111111111"
pretty = true

[submit]
max_concurrency = 4

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# hl7bridge configuration
#
# Every option has a default; delete what you do not need to change.
# Values may reference environment variables as ${NAME}, and any key can be
# overridden with HL7BRIDGE_<SECTION>_<KEY>, e.g. HL7BRIDGE_FHIR_BASE_URL.

# development | staging | production
# Production refuses tls_verify = false.
environment = "development"

[application]
# trace, debug, info, warn, error
log_level = "info"

# Convert and report without posting to the server
dry_run = false

[fhir]
# Base URL of the FHIR R4 server; resources are posted to {base_url}/Patient
base_url = "https://hapi.fhir.org/baseR4/"

# none | basic | bearer
auth_type = "none"
# username = "bridge"
# password = "${HL7BRIDGE_FHIR_PASSWORD}"
# token = "${HL7BRIDGE_FHIR_TOKEN}"

tls_verify = true
timeout_seconds = 30

[fhir.retry]
# Retries after the first attempt. Posts are only repeated when the
# connection failed; searches also retry timeouts and 5xx answers.
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

[fhir.search]
# _count sent with each search, and how many bundle pages to follow
page_size = 50
max_pages = 20

[conversion]
# fixed:  every patient gets identifier_value
# source: identifier taken from PID-3.1
# uuid:   a random UUID per conversion
identifier_strategy = "fixed"
identifier_system = "urn:example:patient-identifier"
identifier_value = "1111111111"

# Indented JSON output
pretty = true

[submit]
# Messages converted and posted at the same time (1-64)
max_concurrency = 4

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: DEFAULT_CONFIG_PATH.to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "hl7bridge.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_load() {
        let minimal = load_config_str(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(minimal.conversion.identifier_value, "1111111111");

        let annotated = load_config_str(&InitArgs::generate_config_with_examples()).unwrap();
        assert_eq!(annotated.fhir.search.page_size, 50);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hl7bridge.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&path).unwrap().contains("[fhir]"));
    }
}

//! Patients command implementation
//!
//! Retrieves every Patient from the configured FHIR server and prints those
//! whose age falls within the requested range as a JSON array.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FAILURES, EXIT_OK};
use crate::adapters::fhir::connect;
use crate::config::BridgeConfig;
use crate::core::filter::{filter_by_age, AgeRange};
use crate::domain::{FhirServerError, PATIENT_RESOURCE_TYPE};
use clap::Args;

/// Arguments for the patients command
#[derive(Args, Debug)]
pub struct PatientsArgs {
    /// Minimum age in whole years (inclusive, default 0)
    #[arg(long)]
    pub min_age: Option<i64>,

    /// Maximum age in whole years (inclusive, default 1000)
    #[arg(long)]
    pub max_age: Option<i64>,
}

impl PatientsArgs {
    /// Execute the patients command
    pub async fn execute(&self, config: BridgeConfig) -> anyhow::Result<i32> {
        let range = match AgeRange::from_bounds(self.min_age, self.max_age) {
            Ok(range) => range,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let server = match connect(&config.fhir) {
            Ok(server) => server,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create FHIR client");
                eprintln!("Failed to create FHIR client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        tracing::info!(
            base_url = server.base_url(),
            min_age = range.min_age(),
            max_age = range.max_age(),
            "Querying patients"
        );

        let resources = match server.search(PATIENT_RESOURCE_TYPE).await {
            Ok(resources) => resources,
            Err(e) => {
                tracing::error!(error = %e, "Patient search failed");
                eprintln!("Patient search failed: {e}");
                return Ok(search_exit_code(&e));
            }
        };

        let retrieved = resources.len();
        let today = chrono::Local::now().date_naive();
        let patients = filter_by_age(resources, range, today);

        tracing::info!(retrieved, matched = patients.len(), "Patient query completed");

        let output = if config.conversion.pretty {
            serde_json::to_string_pretty(&patients)?
        } else {
            serde_json::to_string(&patients)?
        };
        println!("{output}");

        Ok(EXIT_OK)
    }
}

fn search_exit_code(error: &FhirServerError) -> i32 {
    match error {
        FhirServerError::ConnectionFailed(_)
        | FhirServerError::Timeout(_)
        | FhirServerError::Interrupted(_) => EXIT_CONNECTION,
        _ => EXIT_FAILURES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_exit_codes() {
        assert_eq!(
            search_exit_code(&FhirServerError::ConnectionFailed("refused".to_string())),
            EXIT_CONNECTION
        );
        assert_eq!(
            search_exit_code(&FhirServerError::Timeout("30s".to_string())),
            EXIT_CONNECTION
        );
        assert_eq!(
            search_exit_code(&FhirServerError::SearchFailed("bad bundle".to_string())),
            EXIT_FAILURES
        );
    }

    #[tokio::test]
    async fn test_inverted_range_is_a_configuration_error() {
        let args = PatientsArgs {
            min_age: Some(50),
            max_age: Some(10),
        };
        let code = args.execute(BridgeConfig::default()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_prints_filtered_patients() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/Patient")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"resourceType":"Bundle","entry":[
                    {"resource":{"resourceType":"Patient","birthDate":"1926-05-08"}},
                    {"resource":{"resourceType":"Patient"}}
                ]}"#,
            )
            .create_async()
            .await;

        let mut config = BridgeConfig::default();
        config.fhir.base_url = server.url();
        config.fhir.retry.max_retries = 0;

        let args = PatientsArgs {
            min_age: Some(18),
            max_age: None,
        };
        let code = args.execute(config).await.unwrap();

        assert_eq!(code, EXIT_OK);
        mock.assert_async().await;
    }
}

//! Submission coordinator - converts a batch of messages and posts the results
//!
//! Each message is tokenized, mapped and serialized independently, then posted
//! to the FHIR server. Up to `max_concurrency` messages are in flight at once;
//! outcomes are reported in input order.

use crate::adapters::fhir::{FhirServer, SubmissionStatus};
use crate::config::BridgeConfig;
use crate::core::convert::{ConvertedResource, Converter};
use crate::core::submit::summary::{SubmissionError, SubmissionSummary, SubmittedResource};
use crate::domain::{ConversionError, FhirServerError, Result, PATIENT_RESOURCE_TYPE};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// A raw message and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    /// File path or other label used in reports
    pub source: String,

    /// Raw HL7v2 text
    pub raw: String,
}

impl SourceMessage {
    pub fn new(source: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            raw: raw.into(),
        }
    }
}

/// What happened to the converted resource
#[derive(Debug)]
pub enum SubmissionState {
    /// No FHIR server was configured for this run
    NotRequested,
    /// Dry-run mode; the resource was not posted
    DryRun,
    /// The server answered
    Sent(SubmissionStatus),
    /// The server could not be reached
    Failed(FhirServerError),
}

/// Result of processing one message
#[derive(Debug)]
pub struct MessageOutcome {
    pub source: String,
    pub conversion: std::result::Result<ConvertedResource, ConversionError>,
    pub submission: SubmissionState,
}

/// Outcomes in input order plus the aggregated summary
#[derive(Debug)]
pub struct SubmissionReport {
    pub outcomes: Vec<MessageOutcome>,
    pub summary: SubmissionSummary,
}

/// Batch conversion and submission coordinator
pub struct SubmissionCoordinator {
    converter: Arc<Converter>,
    server: Option<Arc<dyn FhirServer>>,
    max_concurrency: usize,
    dry_run: bool,
}

impl SubmissionCoordinator {
    /// Create a coordinator; without a server, messages are only converted
    pub fn new(
        converter: Converter,
        server: Option<Arc<dyn FhirServer>>,
        max_concurrency: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            converter: Arc::new(converter),
            server,
            max_concurrency: max_concurrency.max(1),
            dry_run,
        }
    }

    /// Create a coordinator from configuration
    pub fn from_config(config: &BridgeConfig, server: Option<Arc<dyn FhirServer>>) -> Result<Self> {
        Ok(Self::new(
            Converter::from_config(&config.conversion)?,
            server,
            config.submit.max_concurrency,
            config.application.dry_run,
        ))
    }

    /// Whether posting is suppressed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Process every message and summarize the run
    pub async fn execute(&self, messages: Vec<SourceMessage>) -> SubmissionReport {
        let start_time = Instant::now();

        tracing::info!(
            count = messages.len(),
            max_concurrency = self.max_concurrency,
            dry_run = self.dry_run,
            post = self.server.is_some(),
            "Starting conversion run"
        );

        let mut indexed: Vec<(usize, MessageOutcome)> = stream::iter(messages.into_iter().enumerate())
            .map(|(index, message)| async move { (index, self.process_message(message).await) })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let outcomes: Vec<MessageOutcome> = indexed.into_iter().map(|(_, outcome)| outcome).collect();

        let mut summary = SubmissionSummary::new();
        for outcome in &outcomes {
            record_outcome(&mut summary, outcome);
        }
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        SubmissionReport { outcomes, summary }
    }

    /// Convert one message and, if configured, post it
    pub async fn process_message(&self, message: SourceMessage) -> MessageOutcome {
        let SourceMessage { source, raw } = message;

        let converted = match self.converter.convert_to_json(&raw) {
            Ok(converted) => converted,
            Err(e) => {
                tracing::warn!(source = %source, kind = e.kind(), error = %e, "Conversion failed");
                return MessageOutcome {
                    source,
                    conversion: Err(e),
                    submission: SubmissionState::NotRequested,
                };
            }
        };

        tracing::debug!(
            source = %source,
            control_id = ?converted.control_id,
            "Message converted"
        );

        let submission = match &self.server {
            None => SubmissionState::NotRequested,
            Some(_) if self.dry_run => {
                tracing::info!(source = %source, "Dry run - skipping submission");
                SubmissionState::DryRun
            }
            Some(server) => match server.submit(PATIENT_RESOURCE_TYPE, &converted.body).await {
                Ok(status) => {
                    crate::log_submission_result!(&source, &status);
                    SubmissionState::Sent(status)
                }
                Err(e) => {
                    tracing::error!(source = %source, error = %e, "Submission failed");
                    SubmissionState::Failed(e)
                }
            },
        };

        MessageOutcome {
            source,
            conversion: Ok(converted),
            submission,
        }
    }
}

fn record_outcome(summary: &mut SubmissionSummary, outcome: &MessageOutcome) {
    summary.total_messages += 1;

    let converted = match &outcome.conversion {
        Ok(converted) => converted,
        Err(e) => {
            summary.conversion_failures += 1;
            summary.add_error(SubmissionError::conversion(&outcome.source, e));
            return;
        }
    };
    summary.converted += 1;

    match &outcome.submission {
        SubmissionState::NotRequested => {}
        SubmissionState::DryRun => summary.dry_run_skipped += 1,
        SubmissionState::Sent(status) if status.success => {
            summary.submitted += 1;
            summary.add_submitted_resource(SubmittedResource {
                source: outcome.source.clone(),
                control_id: converted.control_id.clone(),
                status_code: status.status_code,
                location: status.location.clone(),
            });
        }
        SubmissionState::Sent(status) => {
            summary.rejected += 1;
            summary.add_error(SubmissionError::rejected(
                &outcome.source,
                status.status_code,
                status.message.as_deref(),
            ));
        }
        SubmissionState::Failed(e) => {
            summary.transport_failures += 1;
            summary.add_error(SubmissionError::connection(&outcome.source, e));
        }
    }
}

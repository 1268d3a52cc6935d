//! Convert command implementation
//!
//! Reads one HL7v2 message per file, converts each to a FHIR Patient and
//! prints the JSON (or writes it into the `--output` directory). Several files
//! printed to stdout come out as newline-delimited JSON, one compact resource per
//! line. With `--post` the resources are also submitted to the configured FHIR
//! server.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FAILURES, EXIT_OK};
use crate::adapters::fhir::{check_connection, connect};
use crate::config::BridgeConfig;
use crate::core::submit::{
    MessageOutcome, SourceMessage, SubmissionCoordinator, SubmissionReport, SubmissionState,
};
use anyhow::Context;
use clap::Args;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// HL7v2 message files, one message per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory to write `<name>.json` files into instead of printing;
    /// repeated names get a `-2`, `-3`... suffix
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Submit converted resources to the FHIR server
    #[arg(long)]
    pub post: bool,

    /// Convert and report, but do not submit
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self, mut config: BridgeConfig) -> anyhow::Result<i32> {
        if self.compact_output() {
            config.conversion.pretty = false;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let messages = self.read_messages()?;

        let server = if self.post {
            let server = match connect(&config.fhir) {
                Ok(server) => server,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create FHIR client");
                    eprintln!("Failed to create FHIR client: {e}");
                    return Ok(EXIT_CONFIG);
                }
            };

            if !config.application.dry_run {
                if let Err(e) = check_connection(server.as_ref()).await {
                    eprintln!("Cannot reach FHIR server {}: {e}", server.base_url());
                    return Ok(EXIT_CONNECTION);
                }
            }
            Some(server)
        } else {
            None
        };

        let coordinator = SubmissionCoordinator::from_config(&config, server)?;
        let report = coordinator.execute(messages).await;

        let targets: Vec<Option<PathBuf>> = match &self.output {
            Some(dir) => {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create output directory {}", dir.display())
                })?;
                output_paths(dir, &self.files).into_iter().map(Some).collect()
            }
            None => vec![None; report.outcomes.len()],
        };

        for (outcome, target) in report.outcomes.iter().zip(&targets) {
            emit(outcome, target.as_deref())?;
        }

        print_summary(&report, self.post);

        Ok(exit_code(&report))
    }

    /// Several resources on stdout are printed one compact document per line
    fn compact_output(&self) -> bool {
        self.compact || (self.output.is_none() && self.files.len() > 1)
    }

    fn read_messages(&self) -> anyhow::Result<Vec<SourceMessage>> {
        self.files
            .iter()
            .map(|path| {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(SourceMessage::new(path.display().to_string(), raw))
            })
            .collect()
    }
}

fn emit(outcome: &MessageOutcome, target: Option<&Path>) -> anyhow::Result<()> {
    let converted = match &outcome.conversion {
        Ok(converted) => converted,
        Err(e) => {
            eprintln!("{}: {e}", outcome.source);
            return Ok(());
        }
    };

    match target {
        Some(target) => {
            fs::write(target, &converted.body)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            tracing::debug!(source = %outcome.source, path = %target.display(), "Wrote resource");
        }
        None => println!("{}", converted.body),
    }
    Ok(())
}

/// One `<dir>/<file stem>.json` per input, in input order
///
/// Inputs sharing a stem get `<stem>-2.json`, `<stem>-3.json` and so on, so no
/// resource replaces another from the same run.
fn output_paths(dir: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "message".to_string());

            let mut name = format!("{stem}.json");
            let mut n = 1;
            while !taken.insert(name.clone()) {
                n += 1;
                name = format!("{stem}-{n}.json");
            }
            if n > 1 {
                tracing::warn!(source = %file.display(), name = %name, "Output name already used, writing under a new name");
            }
            dir.join(name)
        })
        .collect()
}

fn print_summary(report: &SubmissionReport, posted: bool) {
    let summary = &report.summary;

    eprintln!();
    eprintln!("Conversion Summary:");
    eprintln!("  Messages: {}", summary.total_messages);
    eprintln!("  Converted: {}", summary.converted);
    eprintln!("  Conversion failures: {}", summary.conversion_failures);
    if posted {
        eprintln!("  Submitted: {}", summary.submitted);
        eprintln!("  Rejected: {}", summary.rejected);
        eprintln!("  Transport failures: {}", summary.transport_failures);
        eprintln!("  Dry run skipped: {}", summary.dry_run_skipped);
    }
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    for outcome in &report.outcomes {
        match &outcome.submission {
            SubmissionState::Sent(status) if status.success => {
                eprintln!(
                    "  {} -> {} {}",
                    outcome.source,
                    status.status_code,
                    status.location.as_deref().unwrap_or("")
                );
            }
            SubmissionState::Sent(status) => {
                eprintln!(
                    "  {} -> rejected {}: {}",
                    outcome.source,
                    status.status_code,
                    status.message.as_deref().unwrap_or("")
                );
            }
            SubmissionState::Failed(e) => eprintln!("  {} -> {e}", outcome.source),
            SubmissionState::NotRequested | SubmissionState::DryRun => {}
        }
    }
}

fn exit_code(report: &SubmissionReport) -> i32 {
    if report.summary.has_transport_failures() {
        EXIT_CONNECTION
    } else if !report.summary.is_successful() {
        EXIT_FAILURES
    } else {
        EXIT_OK
    }
}

//! FHIR REST API models
//!
//! Wire structures read from FHIR server responses. Only the parts of `Bundle`
//! and `OperationOutcome` the adapter needs are modelled; resources themselves
//! stay as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    /// Total number of matches across all pages, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default)]
    pub link: Vec<BundleLink>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

/// Paging link of a Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl Bundle {
    /// URL of the following page, if any
    pub fn next_url(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|link| link.relation == "next")
            .map(|link| link.url.as_str())
    }

    /// Consumes the bundle, keeping resources of the given type
    pub fn into_resources(self, resource_type: &str) -> Vec<Value> {
        self.entry
            .into_iter()
            .filter_map(|entry| entry.resource)
            .filter(|resource| {
                resource.get("resourceType").and_then(Value::as_str) == Some(resource_type)
            })
            .collect()
    }
}

/// Error details returned by FHIR servers on rejected requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationOutcome {
    #[serde(default)]
    pub issue: Vec<OperationOutcomeIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationOutcomeIssue {
    #[serde(default)]
    pub severity: String,

    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub diagnostics: Option<String>,
}

impl OperationOutcome {
    /// Parses a response body as an OperationOutcome
    pub fn parse(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        if value.get("resourceType").and_then(Value::as_str) != Some("OperationOutcome") {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// One-line summary of the issues
    pub fn summary(&self) -> String {
        self.issue
            .iter()
            .map(|issue| match &issue.diagnostics {
                Some(diagnostics) => format!("{} ({}): {}", issue.severity, issue.code, diagnostics),
                None => format!("{} ({})", issue.severity, issue.code),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Human-readable message for a rejected request body
///
/// Uses the OperationOutcome diagnostics when the body is one, otherwise the
/// raw body text.
pub fn rejection_message(body: &str) -> String {
    match OperationOutcome::parse(body) {
        Some(outcome) if !outcome.issue.is_empty() => outcome.summary(),
        _ => body.trim().to_string(),
    }
}

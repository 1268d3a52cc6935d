//! Configuration schema types
//!
//! This module defines the configuration structure for hl7bridge. Every section
//! has defaults, so an empty file is a valid configuration that converts with the
//! fixed identifier placeholder and talks to the public HAPI test server.

use crate::config::SecretString;
use crate::core::transform::identifier::IdentifierStrategyKind;
use crate::core::transform::{DEFAULT_IDENTIFIER_SYSTEM, DEFAULT_IDENTIFIER_VALUE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main hl7bridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// FHIR server connection
    #[serde(default)]
    pub fhir: FhirConfig,

    /// HL7v2 to FHIR conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Submission settings
    #[serde(default)]
    pub submit: SubmitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.fhir.validate(&self.environment)?;
        self.conversion.validate()?;
        self.submit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (convert but never post to the FHIR server)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err("fhir.retry.max_retries must be <= 10".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("fhir.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("fhir.retry.initial_delay_ms must not exceed max_delay_ms".to_string());
        }
        Ok(())
    }
}

/// Resource search paging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Entries requested per Bundle page (`_count`)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Bundle pages followed through `link[next]` before stopping
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || self.page_size > 1000 {
            return Err("fhir.search.page_size must be between 1 and 1000".to_string());
        }
        if self.max_pages == 0 {
            return Err("fhir.search.max_pages must be > 0".to_string());
        }
        Ok(())
    }
}

/// FHIR server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication type (none, basic, bearer)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Token for bearer authentication
    #[serde(default)]
    pub token: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the application to
    /// man-in-the-middle attacks. In **production** environments this MUST stay
    /// `true` (enforced by validation).
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Search paging configuration
    #[serde(default)]
    pub search: SearchConfig,
}

impl FhirConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("fhir.base_url must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| format!("fhir.base_url is not a valid URL: {e}"))?;

        let valid_auth_types = ["none", "basic", "bearer"];
        if !valid_auth_types.contains(&self.auth_type.as_str()) {
            return Err(format!(
                "Invalid auth_type '{}'. Must be one of: {}",
                self.auth_type,
                valid_auth_types.join(", ")
            ));
        }

        let blank = |secret: &Option<SecretString>| {
            secret
                .as_ref()
                .map(|s| s.expose_secret().is_empty())
                .unwrap_or(true)
        };

        if self.auth_type == "basic" {
            if self.username.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                return Err("fhir.username cannot be empty when auth_type is 'basic'".to_string());
            }
            if blank(&self.password) {
                return Err("fhir.password cannot be empty when auth_type is 'basic'".to_string());
            }
        }

        if self.auth_type == "bearer" && blank(&self.token) {
            return Err("fhir.token cannot be empty when auth_type is 'bearer'".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or set 'environment = \"development\"' or \
                'environment = \"staging\"' for testing."
                    .to_string(),
            );
        }

        if self.timeout_seconds == 0 {
            return Err("fhir.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_type: default_auth_type(),
            username: None,
            password: None,
            token: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Conversion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// How identifier values are produced (fixed, source, uuid)
    #[serde(default = "default_identifier_strategy")]
    pub identifier_strategy: String,

    /// Namespace URI attached to every synthesized identifier
    #[serde(default = "default_identifier_system")]
    pub identifier_system: String,

    /// Value used by the fixed strategy
    #[serde(default = "default_identifier_value")]
    pub identifier_value: String,

    /// Indent JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            identifier_strategy: default_identifier_strategy(),
            identifier_system: default_identifier_system(),
            identifier_value: default_identifier_value(),
            pretty: true,
        }
    }
}

impl ConversionConfig {
    fn validate(&self) -> Result<(), String> {
        let kind =
            IdentifierStrategyKind::from_str(&self.identifier_strategy).map_err(|e| e.to_string())?;

        if self.identifier_system.is_empty() {
            return Err("conversion.identifier_system cannot be empty".to_string());
        }

        if kind == IdentifierStrategyKind::Fixed && self.identifier_value.is_empty() {
            return Err(
                "conversion.identifier_value cannot be empty when identifier_strategy is 'fixed'"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Submission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Messages converted and posted at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl SubmitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err("submit.max_concurrency must be between 1 and 64".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://hapi.fhir.org/baseR4/".to_string()
}

fn default_auth_type() -> String {
    "none".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_page_size() -> usize {
    50
}

fn default_max_pages() -> usize {
    20
}

fn default_identifier_strategy() -> String {
    "fixed".to_string()
}

fn default_identifier_system() -> String {
    DEFAULT_IDENTIFIER_SYSTEM.to_string()
}

fn default_identifier_value() -> String {
    DEFAULT_IDENTIFIER_VALUE.to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

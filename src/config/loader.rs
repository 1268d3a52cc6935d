//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BridgeConfig;
use super::secret::secret_string;
use crate::domain::errors::BridgeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "HL7BRIDGE";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`BridgeConfig`]
/// 4. Applies environment variable overrides (`HL7BRIDGE_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`BridgeError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, the TOML does not parse, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use hl7bridge::config::loader::load_config;
///
/// let config = load_config("hl7bridge.toml").expect("Failed to load config");
/// println!("{}", config.fhir.base_url);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BridgeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text, with the same steps as [`load_config`]
pub fn load_config_str(contents: &str) -> Result<BridgeConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BridgeConfig = toml::from_str(&contents)
        .map_err(|e| BridgeError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BridgeError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BridgeError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }

            re.replace_all(line, |caps: &regex::Captures| {
                let var_name = &caps[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(BridgeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_var(section, key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            BridgeError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
    }
}

/// Applies environment variable overrides using the `HL7BRIDGE_*` prefix
///
/// Variables follow the pattern `HL7BRIDGE_<SECTION>_<KEY>`, for example
/// `HL7BRIDGE_FHIR_BASE_URL` or `HL7BRIDGE_CONVERSION_IDENTIFIER_STRATEGY`.
fn apply_env_overrides(config: &mut BridgeConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parse_override("APPLICATION", "DRY_RUN")? {
        config.application.dry_run = val;
    }

    // FHIR overrides
    if let Some(val) = env_var("FHIR", "BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Some(val) = env_var("FHIR", "AUTH_TYPE") {
        config.fhir.auth_type = val;
    }
    if let Some(val) = env_var("FHIR", "USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Some(val) = env_var("FHIR", "PASSWORD") {
        config.fhir.password = Some(secret_string(val));
    }
    if let Some(val) = env_var("FHIR", "TOKEN") {
        config.fhir.token = Some(secret_string(val));
    }
    if let Some(val) = parse_override("FHIR", "TLS_VERIFY")? {
        config.fhir.tls_verify = val;
    }
    if let Some(val) = parse_override("FHIR", "TIMEOUT_SECONDS")? {
        config.fhir.timeout_seconds = val;
    }
    if let Some(val) = parse_override("FHIR", "MAX_RETRIES")? {
        config.fhir.retry.max_retries = val;
    }
    if let Some(val) = parse_override("FHIR", "PAGE_SIZE")? {
        config.fhir.search.page_size = val;
    }
    if let Some(val) = parse_override("FHIR", "MAX_PAGES")? {
        config.fhir.search.max_pages = val;
    }

    // Conversion overrides
    if let Some(val) = env_var("CONVERSION", "IDENTIFIER_STRATEGY") {
        config.conversion.identifier_strategy = val;
    }
    if let Some(val) = env_var("CONVERSION", "IDENTIFIER_SYSTEM") {
        config.conversion.identifier_system = val;
    }
    if let Some(val) = env_var("CONVERSION", "IDENTIFIER_VALUE") {
        config.conversion.identifier_value = val;
    }
    if let Some(val) = parse_override("CONVERSION", "PRETTY")? {
        config.conversion.pretty = val;
    }

    // Submit overrides
    if let Some(val) = parse_override("SUBMIT", "MAX_CONCURRENCY")? {
        config.submit.max_concurrency = val;
    }

    // Logging overrides
    if let Some(val) = parse_override("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

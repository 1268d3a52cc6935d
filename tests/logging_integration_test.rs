//! Integration tests for logging functionality

use hl7bridge::config::LoggingConfig;
use hl7bridge::logging::{init_logging, parse_log_level};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    assert!(parse_log_level("verbose").is_err());
}

// The global subscriber can be installed once per process, so this is the
// only test in this binary that initializes logging.
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).expect("logging should initialize");
    assert!(guard.has_file_output());
    assert!(log_path.is_dir());

    tracing::info!(source = "adt.hl7", "Message converted");
    drop(guard);

    assert!(log_path.join("hl7bridge.log").exists());

    // A second subscriber is refused
    assert!(init_logging("info", &LoggingConfig::default()).is_err());
}

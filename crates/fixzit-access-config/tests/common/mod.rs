// crates/fixzit-access-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across config integration tests.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use fixzit_access_config::ConfigError;
use fixzit_access_config::FixzitAccessConfig;

/// Result type for tests that report failures as strings.
pub type TestResult = Result<(), String>;

/// Parses and validates a TOML string.
pub fn config_from_toml(toml_str: &str) -> Result<FixzitAccessConfig, ConfigError> {
    FixzitAccessConfig::from_toml_str(toml_str)
}

/// Asserts that `result` is an invalid-config error mentioning `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(ConfigError::Invalid(message)) if message.contains(needle) => Ok(()),
        Err(error) => Err(format!("error {error} did not contain {needle}")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

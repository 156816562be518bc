// crates/approval-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for approval-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use approval_gate_config::ApprovalGateConfig;
use approval_gate_config::ConfigError;

/// Test result alias used across suites.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into an `ApprovalGateConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<ApprovalGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a config monitoring `spec.resources` with all other defaults.
pub fn minimal_config() -> Result<ApprovalGateConfig, toml::de::Error> {
    config_from_toml("[gate]\ndata_field = \"spec.resources\"\n")
}

/// Asserts that `result` failed with an error containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

// crates/approval-gate-config/src/config.rs
// ============================================================================
// Module: Approval Gate Configuration
// Description: Configuration loading and validation for the approval gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: approval-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a gate that cannot be
//! configured never evaluates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use approval_gate_core::FileAuditSink;
use approval_gate_core::GateAuditSink;
use approval_gate_core::GateConfig;
use approval_gate_core::NoopAuditSink;
use approval_gate_core::RawGateConfig;
use approval_gate_core::StderrAuditSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "approval-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "APPROVAL_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Approval gate file configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovalGateConfig {
    /// Gate input settings.
    #[serde(default)]
    pub gate: GateSection,
    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ApprovalGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// The `[gate]` section is checked only once `data_field` is set, so a
    /// file carrying audit settings alone stays valid for callers that take
    /// gate input from elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.is_configured() {
            self.gate.resolve()?;
        }
        self.audit.validate()
    }

    /// Resolves the `[gate]` section into an evaluation-ready config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the gate settings are rejected,
    /// including when `gate.data_field` is missing.
    pub fn gate_config(&self) -> Result<GateConfig, ConfigError> {
        self.gate.resolve()
    }
}

/// `[gate]` section; a snake_case mirror of the gate's wire input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateSection {
    /// Dot path of the monitored subtree.
    #[serde(default)]
    pub data_field: String,
    /// Dot path of the approval flag.
    #[serde(default)]
    pub approval_field: Option<String>,
    /// Dot path of the last approved hash.
    #[serde(default)]
    pub current_hash_field: Option<String>,
    /// Whether halt messages embed hashes and approval instructions.
    #[serde(default)]
    pub detailed_condition: Option<bool>,
    /// Base message shown when approval is required.
    #[serde(default)]
    pub approval_message: Option<String>,
    /// Hash algorithm label.
    #[serde(default)]
    pub hash_algorithm: Option<String>,
}

impl GateSection {
    /// Converts the section into the gate's raw input form.
    #[must_use]
    pub fn to_raw(&self) -> RawGateConfig {
        RawGateConfig {
            data_field: self.data_field.clone(),
            approval_field: self.approval_field.clone(),
            current_hash_field: self.current_hash_field.clone(),
            detailed_condition: self.detailed_condition,
            approval_message: self.approval_message.clone(),
            hash_algorithm: self.hash_algorithm.clone(),
        }
    }

    /// Returns true when the section names a monitored subtree.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.data_field.trim().is_empty()
    }

    /// Applies gate defaults and validation.
    fn resolve(&self) -> Result<GateConfig, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::Invalid("gate.data_field must be set".to_string()));
        }
        self.to_raw().resolve().map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

/// `[audit]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Audit sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            sink: AuditSinkKind::default(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if self.enabled && self.sink == AuditSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid("audit.path is required when sink = \"file\"".into()));
        }
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the settings are invalid or the audit
    /// log file cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn GateAuditSink>, ConfigError> {
        self.validate()?;
        if !self.enabled {
            return Ok(Arc::new(NoopAuditSink));
        }
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when sink = \"file\"".into()))
            }
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard events.
    None,
}

/// Default audit enablement.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

//! Error types for provisioning operations.
//!
//! This module defines [`ProvisionError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `PermissionDenied` and `Environment` are raised by the preflight
//!   checks, before anything on the host is touched
//! - Any error escaping a fatal step is wrapped into `FatalStep`
//! - `Advisory` is produced by best-effort steps; the orchestrator logs
//!   and records it, then keeps going
//! - Use `anyhow::Error` (via `ProvisionError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Not running with administrative privileges.
    #[error("Root privileges required: {message}")]
    PermissionDenied { message: String },

    /// The invoking (non-elevated) user could not be resolved.
    #[error("Cannot resolve invoking user: {message}")]
    Environment { message: String },

    /// A required step failed; the run stops here.
    #[error("Step '{step}' failed: {message}")]
    FatalStep { step: String, message: String },

    /// An optional step failed; logged and swallowed by the orchestrator.
    #[error("Step '{step}' did not complete: {message}")]
    Advisory { step: String, message: String },

    /// External command exited unsuccessfully.
    #[error("Command failed ({}): {command}", exit_status(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// External command could not be started at all.
    #[error("Failed to start '{command}': {message}")]
    CommandSpawn { command: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A value cannot be written safely into a service unit.
    #[error("Invalid value for {key}=: {message}")]
    UnitValidation { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProvisionError {
    /// Whether this error was raised before any host mutation could happen.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            ProvisionError::PermissionDenied { .. } | ProvisionError::Environment { .. }
        )
    }

    /// Name of the step this error belongs to, if any.
    pub fn step(&self) -> Option<&str> {
        match self {
            ProvisionError::FatalStep { step, .. } | ProvisionError::Advisory { step, .. } => {
                Some(step)
            }
            _ => None,
        }
    }
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "killed by signal".to_string(),
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

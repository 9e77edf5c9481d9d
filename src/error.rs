//! Error types for rigup operations.
//!
//! This module defines [`ProvisionError`], the error type used throughout
//! the engine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Registration and resolution errors fail before any handler runs
//! - Execution errors name the failing step and wrap the handler's cause
//! - Step handlers return `anyhow::Result<()>`, so any error type works there

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rigup operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A step definition is malformed.
    #[error("Invalid step '{step}': {field} {message}")]
    Registration {
        step: String,
        field: &'static str,
        message: String,
    },

    /// Step dependency cycle detected.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    /// A step depends on a step that was never registered.
    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    MissingDependency { step: String, dependency: String },

    /// A step handler failed.
    #[error("Step '{step}' ({description}) failed: {source:#}")]
    Execution {
        step: String,
        description: String,
        #[source]
        source: anyhow::Error,
    },

    /// An accumulator entry is malformed.
    #[error("Invalid entry {index} in {list}: {message}")]
    Validation {
        list: &'static str,
        index: usize,
        message: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A configuration value could not be interpreted.
    #[error("Invalid value for {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad category of a [`ProvisionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Registration,
    Resolution,
    Execution,
    Validation,
    Config,
}

impl ProvisionError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisionError::Registration { .. } => ErrorKind::Registration,
            ProvisionError::Cycle { .. } | ProvisionError::MissingDependency { .. } => {
                ErrorKind::Resolution
            }
            ProvisionError::Execution { .. } => ErrorKind::Execution,
            ProvisionError::Validation { .. } => ErrorKind::Validation,
            ProvisionError::ConfigNotFound { .. }
            | ProvisionError::ConfigParse { .. }
            | ProvisionError::InvalidConfigValue { .. }
            | ProvisionError::Io(_) => ErrorKind::Config,
        }
    }

    /// Whether this error was raised while computing the execution order.
    ///
    /// Nothing has run when this is true, so fixing the steps and retrying is safe.
    pub fn is_resolution(&self) -> bool {
        self.kind() == ErrorKind::Resolution
    }

    /// Name of the step the error is about, if any.
    pub fn step(&self) -> Option<&str> {
        match self {
            ProvisionError::Registration { step, .. }
            | ProvisionError::MissingDependency { step, .. }
            | ProvisionError::Execution { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Result type alias for rigup operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

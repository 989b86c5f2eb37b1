//! Core error types for doorsuffer-core.
//!
//! This module defines the error hierarchy using thiserror. Note that most
//! runtime conditions in the settlement engine are deliberately *not* errors:
//! ledger underflow clamps to zero, repeat settlement attempts are structural
//! no-ops, and malformed persisted state falls back to empty collections.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for doorsuffer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
///
/// Load failures are handled soft by the engine and never surface here;
/// these variants cover the write path only.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to write a collection snapshot
    #[error("Failed to write snapshot for '{key}' at {path}: {message}")]
    WriteFailed {
        key: String,
        path: PathBuf,
        message: String,
    },

    /// Snapshot could not be serialized
    #[error("Failed to serialize snapshot for '{key}': {message}")]
    SerializeFailed { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors raised at registration boundaries.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required text field was empty
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

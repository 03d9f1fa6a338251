//! # Structured Error Handling
//!
//! Error taxonomy for the registry core. The variants map one-to-one onto
//! the failure classes the host has to render differently: configuration
//! problems are fatal to identity, store faults are local to the operation
//! that hit them, validation failures never reach the store, and "not found"
//! is a distinct user-facing outcome rather than a store fault.
//!
//! Logical anomalies (an update that affected an unexpected number of rows)
//! are deliberately *not* errors; they are logged at the call site and the
//! operation reports success, because the source of truth may simply have
//! moved underneath us.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Bad or missing host-supplied configuration (credential file, unset
    /// self-address, unusable table name). Fatal to identity until a reload.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Self-identity could not be resolved or is required but absent.
    #[error("Identity error: {message}")]
    Identity { message: String },

    /// A store operation failed. `operation` names the attempted operation
    /// so log lines identify what will not happen.
    #[error("Database error in '{operation}': {message}")]
    Database { operation: String, message: String },

    /// The targeted record does not exist. Reported distinctly from a failed
    /// mutation so the host can answer "no such server" instead of "error".
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// User input rejected before any store contact.
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl RegistryError {
    /// Wrap a store fault, tagging it with the operation that was abandoned.
    pub fn database(operation: &str, source: sqlx::Error) -> Self {
        RegistryError::Database {
            operation: operation.to_string(),
            message: source.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        RegistryError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RegistryError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        RegistryError::NotFound {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

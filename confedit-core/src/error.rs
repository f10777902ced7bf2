//! Error types for confedit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in confedit operations.
#[derive(Error, Debug)]
pub enum ConfEditError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not parse conference data: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Another request is already in flight")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConfEditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfEditError::Validation(_) | ConfEditError::Parse(_) => ErrorKind::Validation,
            ConfEditError::NotFound(_) => ErrorKind::NotFound,
            ConfEditError::Permission(_) => ErrorKind::Permission,
            _ => ErrorKind::Provider,
        }
    }

    /// The message without the category prefix added by `Display`.
    pub fn message(&self) -> String {
        match self {
            ConfEditError::Validation(msg)
            | ConfEditError::Parse(msg)
            | ConfEditError::NotFound(msg)
            | ConfEditError::Provider(msg)
            | ConfEditError::Permission(msg)
            | ConfEditError::Config(msg)
            | ConfEditError::ProviderNotInstalled(msg)
            | ConfEditError::Serialization(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Rebuild a typed error from a kind and message received over the protocol.
    pub fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Validation => ConfEditError::Validation(message),
            ErrorKind::NotFound => ConfEditError::NotFound(message),
            ErrorKind::Permission => ConfEditError::Permission(message),
            ErrorKind::Provider => ConfEditError::Provider(message),
        }
    }
}

/// Coarse error category carried across the provider protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Permission,
    #[default]
    Provider,
}

/// Result type alias for confedit operations.
pub type ConfEditResult<T> = Result<T, ConfEditError>;

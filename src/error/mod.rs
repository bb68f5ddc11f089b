//! Error types for vision-relay.
//!
//! Pipeline stages fail with a raw [`VisionError`]. The [`handler::ErrorHandler`]
//! classifies those into a [`StandardError`] carrying the taxonomy fields.

pub mod context;
pub mod handler;
pub mod recovery;
pub mod unified;

pub use context::ErrorContext;
pub use handler::{ErrorHandler, HandlingStrategy};
pub use recovery::{RecoveryCoordinator, RecoveryOutcome, RecoveryStrategy};
pub use unified::{ErrorCategory, ErrorKind, Severity, StandardError};

use thiserror::Error;

/// Raw failure raised by a pipeline stage before classification.
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{message}")]
    NotFound { message: String, path: String },

    #[error("{message}")]
    Network {
        message: String,
        url: Option<String>,
    },

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Standard(#[from] StandardError),

    #[error("{0}")]
    Other(String),
}

impl VisionError {
    /// Validation failure not tied to a specific field.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure for a named input field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            url: None,
        }
    }

    /// Non-2xx or malformed upstream response.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Non-2xx response, keeping the raw body text.
    pub fn api_with_body(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Short type name, matched by name-based classification strategies.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Network { .. } => "NetworkError",
            Self::Timeout(_) => "TimeoutError",
            Self::Api { .. } => "ApiError",
            Self::Http(_) => "HttpError",
            Self::Io(_) => "IoError",
            Self::Serialization(_) => "SerializationError",
            Self::Standard(_) => "StandardError",
            Self::Other(_) => "Error",
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VisionError>;

//! Error handling for the Warehouse Retail Management client
//!
//! Every failure is scoped to the single operation that raised it. Server
//! messages are kept verbatim so the operator sees exactly what the backend
//! said.

use shared::DomainError;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Local errors (no request was made)
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export error: {0}")]
    Export(String),

    // Server errors
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    ServerValidation { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    // Network errors
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Coarse classification used to decide how the UI reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input problem; no request made
    Validation,
    /// Local stock ceiling exceeded
    InsufficientStock,
    /// Barcode, batch or record absent; reset the input
    NotFound,
    /// Rejected by the backend's checks
    ServerValidation,
    /// Network or server failure; keep state for a manual retry
    Transport,
}

impl ClientError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Domain(e) => e.code(),
            ClientError::Configuration(_) => "CONFIGURATION_ERROR",
            ClientError::Export(_) => "EXPORT_ERROR",
            ClientError::NotFound { .. } => "NOT_FOUND",
            ClientError::ServerValidation { .. } => "SERVER_VALIDATION_ERROR",
            ClientError::Unauthorized { .. } => "UNAUTHORIZED",
            ClientError::Forbidden { .. } => "FORBIDDEN",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::Decode { .. } => "DECODE_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Domain(DomainError::InsufficientStock { .. }) => {
                ErrorKind::InsufficientStock
            }
            ClientError::Domain(_) | ClientError::Configuration(_) | ClientError::Export(_) => {
                ErrorKind::Validation
            }
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::ServerValidation { .. } | ClientError::Forbidden { .. } => {
                ErrorKind::ServerValidation
            }
            ClientError::Unauthorized { .. }
            | ClientError::Server { .. }
            | ClientError::Decode { .. }
            | ClientError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Map a non-2xx response to an error, keeping the server's text
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 | 409 | 422 => ClientError::ServerValidation { message },
            401 => ClientError::Unauthorized { message },
            403 => ClientError::Forbidden { message },
            404 => ClientError::NotFound { message },
            code => ClientError::Server {
                status: code,
                message,
            },
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(e: config::ConfigError) -> Self {
        ClientError::Configuration(e.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

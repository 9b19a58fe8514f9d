//! Local (pre-network) errors raised by the line-item store and the workflow

use thiserror::Error;

/// Errors detected on the client before any request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Insufficient stock for {product_id}/{batch_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        batch_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Batch {batch_id} is expired and cannot be selected")]
    ExpiredBatch { batch_id: String },

    #[error("No line for {product_id}/{batch_id}")]
    LineNotFound { product_id: String, batch_id: String },

    #[error("Cannot {action} while {phase}")]
    InvalidTransition { phase: String, action: String },
}

impl DomainError {
    pub fn validation(field: &str, message: &str) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Collapse `validator` failures into one validation error on `field`
    pub fn from_validation(field: &str, errors: &validator::ValidationErrors) -> Self {
        // Struct-level errors are reported under the "__all__" field
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_values()
            .flatten()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        messages.sort();
        messages.dedup();
        Self::validation(field, &messages.join("; "))
    }

    /// Stable error code, matching the codes used for server errors
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            DomainError::ExpiredBatch { .. } => "EXPIRED_BATCH",
            DomainError::LineNotFound { .. } => "LINE_NOT_FOUND",
            DomainError::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

//! Error types for the board engine and work item stores

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Work item not found in the local snapshot or the remote store
    #[error("work item not found: {id}")]
    WorkNotFound { id: String },

    /// A drag gesture is already open on this board
    #[error("a drag gesture is already in progress")]
    GestureInProgress,

    /// The previous gesture's writes have not settled yet
    #[error("the previous move is still being saved")]
    ReconciliationPending,

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The store rejected our credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success response from the Cloud Functions API
    #[error("store API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Store-side failure that carries no HTTP status
    #[error("store error: {message}")]
    Store { message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a work-not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::WorkNotFound { id: id.into() }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a generic store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Check if retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

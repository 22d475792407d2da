//! Error types for repository operations.

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Backend connection failure; typically transient.
    #[error("connection error: {0}")]
    Connection(String),

    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Data failed validation before or after a storage operation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration or initialization error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal/unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether retrying the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<crate::error::EngineError> for RepositoryError {
    fn from(err: crate::error::EngineError) -> Self {
        RepositoryError::validation(err.to_string())
    }
}

//! Error types for listing authorization
//!
//! Malformed filter tokens never show up here: they are absorbed by the
//! codec and the request proceeds unfiltered.

use dealer_query::CodecError;
use dealer_rbac::RbacError;
use thiserror::Error;

/// Listing access error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Own-records scope requires an identified user
    #[error("Authentication required to list own records")]
    Unauthenticated,

    /// Role grants no listing visibility
    #[error("Forbidden: role grants no listing visibility")]
    Forbidden,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Role table error
    #[error(transparent)]
    Rbac(#[from] RbacError),

    /// Filter token could not be built
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for listing access operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Authorization refusals are expected and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AccessError::Config(_) | AccessError::Rbac(_) | AccessError::Codec(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Unauthenticated => 401,
            AccessError::Forbidden => 403,
            AccessError::Config(_) | AccessError::Rbac(_) | AccessError::Codec(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "UNAUTHENTICATED",
            AccessError::Forbidden => "FORBIDDEN",
            AccessError::Config(_) => "CONFIG_ERROR",
            AccessError::Rbac(_) => "ROLE_TABLE_ERROR",
            AccessError::Codec(e) => e.error_code(),
        }
    }
}

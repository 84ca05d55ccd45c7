//! Error types for role table configuration.

use thiserror::Error;

/// RBAC error types.
///
/// Resolution itself is total and never produces an error; these only
/// arise while loading a role table.
#[derive(Debug, Error)]
pub enum RbacError {
    /// Role table document could not be parsed
    #[error("Invalid role table: {0}")]
    InvalidRoleTable(String),

    /// Role identifier is empty
    #[error("Role identifier must not be empty")]
    EmptyRole,
}

/// Result type for RBAC operations.
pub type RbacResult<T> = Result<T, RbacError>;

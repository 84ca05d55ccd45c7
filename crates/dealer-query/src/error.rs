//! Error types for filter token encoding and decoding.

use thiserror::Error;

/// Codec error types.
///
/// `Serialization` is a programming error on the encode side. Every other
/// variant describes a malformed token and is absorbed by
/// [`QueryTokenCodec::decode`](crate::QueryTokenCodec::decode).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Value cannot be represented as a filter
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A `%` was not followed by two hex digits
    #[error("Malformed percent-encoding at byte {position}")]
    MalformedPercentEncoding {
        /// Byte offset of the offending `%`.
        position: usize,
    },

    /// A character outside the token alphabet was not percent-escaped
    #[error("Unescaped character in filter token at byte {position}")]
    UnescapedCharacter {
        /// Byte offset of the offending character.
        position: usize,
    },

    /// Percent-decoded bytes are not UTF-8
    #[error("Decoded filter token is not valid UTF-8")]
    InvalidUtf8,

    /// Decoded text is not a valid filter payload
    #[error("Malformed filter payload: {0}")]
    MalformedPayload(String),

    /// Payload parsed but its top level is not a mapping
    #[error("Filter payload must be an object")]
    NotAnObject,

    /// Token exceeds the configured length cap
    #[error("Filter token is {len} bytes, exceeding the {max} byte limit")]
    TokenTooLong {
        /// Token length in bytes.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    /// Check if this error describes a malformed incoming token
    /// (as opposed to a value that could not be encoded).
    pub fn is_malformed(&self) -> bool {
        !matches!(self, CodecError::Serialization(_))
    }

    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            CodecError::Serialization(_) => "SERIALIZATION_ERROR",
            CodecError::MalformedPercentEncoding { .. } => "MALFORMED_PERCENT_ENCODING",
            CodecError::UnescapedCharacter { .. } => "UNESCAPED_CHARACTER",
            CodecError::InvalidUtf8 => "INVALID_UTF8",
            CodecError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            CodecError::NotAnObject => "NOT_AN_OBJECT",
            CodecError::TokenTooLong { .. } => "TOKEN_TOO_LONG",
        }
    }
}

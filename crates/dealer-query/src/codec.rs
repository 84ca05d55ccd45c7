//! # Filter token codec
//!
//! Turns a [`FilterQuery`] into a URL-safe token and back.
//!
//! ## Wire format
//!
//! ```text
//! token = percent_encode(compact_json(query))
//!
//! {"make":"Toyota","priceMax":500000}
//!   -> %7B%22make%22%3A%22Toyota%22%2C%22priceMax%22%3A500000%7D
//! ```
//!
//! Only `A-Z a-z 0-9 - _ . ~` survive unescaped. Keys are emitted in sorted
//! order, so equal queries always produce equal tokens. Incoming tokens may
//! also carry `! ' ( ) *` unescaped, as browsers' `encodeURIComponent`
//! leaves them; any other raw character makes the token malformed.
//!
//! Floats are written in shortest round-trip form and parsed back exactly.
//! Nesting is limited to [`MAX_NESTING_DEPTH`] levels of lists and maps.
//!
//! ## Failure handling
//!
//! [`QueryTokenCodec::decode`] never fails. A malformed token is logged at
//! `warn` and treated as "no filter", so a broken or tampered link degrades
//! to an unfiltered search instead of an error page. Use
//! [`QueryTokenCodec::try_decode`] to see the error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodecError, CodecResult};
use crate::params::ParamSource;
use crate::value::{FilterQuery, FilterValue};

/// Query-string key carrying the filter token.
pub const FILTER_PARAM: &str = "q";

/// Deepest list/map nesting `encode` accepts. The top-level query counts
/// as one level. Stays well under the JSON parser's recursion limit.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Longest raw value echoed into a diagnostic.
const LOGGED_TOKEN_CHARS: usize = 256;

/// Encoded form of a [`FilterQuery`], safe to embed as a query-string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryToken(String);

impl QueryToken {
    /// Get the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Token length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stateless filter token encoder/decoder.
///
/// # Example
///
/// ```
/// use dealer_query::{FilterQuery, QueryParams, QueryTokenCodec};
///
/// let codec = QueryTokenCodec::new();
/// let query = FilterQuery::new().with("make", "Toyota").with("priceMax", 500_000);
///
/// let token = codec.encode(&query).unwrap();
/// let params = QueryParams::new().with_filter(&token);
///
/// assert_eq!(codec.decode(&params), Some(query));
/// assert_eq!(codec.decode(&QueryParams::new()), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryTokenCodec {
    max_token_len: Option<usize>,
}

impl QueryTokenCodec {
    /// Create a codec with no token length limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject incoming tokens longer than `max` bytes. `0` removes the limit.
    pub fn with_max_token_len(mut self, max: usize) -> Self {
        self.max_token_len = (max > 0).then_some(max);
        self
    }

    /// The configured token length limit, if any.
    pub fn max_token_len(&self) -> Option<usize> {
        self.max_token_len
    }

    /// Encode a filter query.
    ///
    /// # Errors
    ///
    /// `Serialization` if the query nests deeper than
    /// [`MAX_NESTING_DEPTH`] or cannot be written as JSON.
    pub fn encode(&self, query: &FilterQuery) -> CodecResult<QueryToken> {
        if exceeds_depth(query, MAX_NESTING_DEPTH) {
            return Err(CodecError::Serialization(format!(
                "filter nests deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        let json = serde_json::to_string(query).map_err(|e| CodecError::Serialization(e.to_string()))?;
        Ok(QueryToken(urlencoding::encode(&json).into_owned()))
    }

    /// Encode any serializable value as a filter token.
    ///
    /// Lets handlers keep typed search structs while sharing the same token
    /// format.
    ///
    /// # Errors
    ///
    /// `Serialization` if the value cannot be represented as JSON (for
    /// example a map with non-string keys) or does not serialize to an
    /// object.
    pub fn encode_value<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<QueryToken> {
        let json = serde_json::to_value(value).map_err(|e| CodecError::Serialization(e.to_string()))?;
        if !json.is_object() {
            return Err(CodecError::Serialization(
                "filter must serialize to an object".to_string(),
            ));
        }
        let query: FilterQuery =
            serde_json::from_value(json).map_err(|e| CodecError::Serialization(e.to_string()))?;
        self.encode(&query)
    }

    /// Decode the filter parameter, reporting malformed tokens.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` if `q` is absent or empty
    /// - `Ok(Some(query))` for a well-formed token
    /// - `Err(_)` for a malformed token
    pub fn try_decode<P: ParamSource + ?Sized>(&self, params: &P) -> CodecResult<Option<FilterQuery>> {
        match params.param(FILTER_PARAM) {
            None | Some("") => Ok(None),
            Some(raw) => self.decode_token(raw).map(Some),
        }
    }

    /// Decode the filter parameter, degrading malformed tokens to `None`.
    ///
    /// Never fails. Malformed tokens are logged with the error and the
    /// offending value.
    pub fn decode<P: ParamSource + ?Sized>(&self, params: &P) -> Option<FilterQuery> {
        match self.try_decode(params) {
            Ok(Some(query)) => Some(query),
            Ok(None) => {
                tracing::debug!("No filter token in request");
                None
            }
            Err(e) => {
                let raw = params.param(FILTER_PARAM).unwrap_or_default();
                tracing::warn!(
                    error = %e,
                    error_code = e.error_code(),
                    raw = %truncate_for_log(raw),
                    raw_len = raw.len(),
                    "Discarding malformed filter token"
                );
                None
            }
        }
    }

    /// Decode the filter parameter into a typed search struct.
    ///
    /// Behaves like [`decode`](Self::decode); a payload that does not fit
    /// `T` is also treated as malformed.
    pub fn decode_as<T: DeserializeOwned, P: ParamSource + ?Sized>(&self, params: &P) -> Option<T> {
        let query = self.decode(params)?;
        match serde_json::to_value(&query).and_then(serde_json::from_value) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Filter token does not match the expected shape");
                None
            }
        }
    }

    /// Decode a bare token, without a parameter container.
    ///
    /// # Errors
    ///
    /// Any [`CodecError`] other than `Serialization`.
    pub fn decode_token(&self, raw: &str) -> CodecResult<FilterQuery> {
        if let Some(max) = self.max_token_len {
            if raw.len() > max {
                return Err(CodecError::TokenTooLong { len: raw.len(), max });
            }
        }

        check_token_characters(raw)?;
        let text = urlencoding::decode(raw).map_err(|_| CodecError::InvalidUtf8)?;

        let value: FilterValue =
            serde_json::from_str(&text).map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
        match value {
            FilterValue::Map(fields) => Ok(FilterQuery::from(fields)),
            _ => Err(CodecError::NotAnObject),
        }
    }
}

/// Encode `query` with the default codec.
pub fn encode(query: &FilterQuery) -> CodecResult<QueryToken> {
    QueryTokenCodec::new().encode(query)
}

/// Decode the filter parameter with the default codec.
pub fn decode<P: ParamSource + ?Sized>(params: &P) -> Option<FilterQuery> {
    QueryTokenCodec::new().decode(params)
}

/// Every `%` must start a two-digit hex escape, and everything else must be
/// a character `encodeURIComponent` leaves alone.
fn check_token_characters(raw: &str) -> CodecResult<()> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            if !bytes[i].is_ascii_alphanumeric() && !b"-_.~!'()*".contains(&bytes[i]) {
                return Err(CodecError::UnescapedCharacter { position: i });
            }
            i += 1;
        } else {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(CodecError::MalformedPercentEncoding { position: i });
            }
            i += 3;
        }
    }
    Ok(())
}

/// Check whether `query` nests lists/maps more than `max` levels deep.
fn exceeds_depth(query: &FilterQuery, max: usize) -> bool {
    let mut pending: Vec<(&FilterValue, usize)> = query.iter().map(|(_, v)| (v, 1)).collect();
    while let Some((value, parent_depth)) = pending.pop() {
        let depth = parent_depth + 1;
        match value {
            FilterValue::List(items) => {
                if depth > max {
                    return true;
                }
                pending.extend(items.iter().map(|child| (child, depth)));
            }
            FilterValue::Map(fields) => {
                if depth > max {
                    return true;
                }
                pending.extend(fields.values().map(|child| (child, depth)));
            }
            _ => {}
        }
    }
    false
}

fn truncate_for_log(raw: &str) -> String {
    if raw.chars().count() <= LOGGED_TOKEN_CHARS {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(LOGGED_TOKEN_CHARS).collect();
        format!("{head}...")
    }
}

//! Request parameter containers
//!
//! The routing layer hands the codec a set of query-string pairs. Any type
//! that can look a value up by key works; [`QueryParams`] is the concrete
//! container used when parsing or building URLs.

use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded;

use crate::codec::FILTER_PARAM;
use crate::QueryToken;

/// Source of query-string parameters.
pub trait ParamSource {
    /// Look up the value of `key`, if present.
    fn param(&self, key: &str) -> Option<&str>;
}

impl<T: ParamSource + ?Sized> ParamSource for &T {
    fn param(&self, key: &str) -> Option<&str> {
        (**self).param(key)
    }
}

impl<S: std::hash::BuildHasher> ParamSource for HashMap<String, String, S> {
    fn param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl ParamSource for BTreeMap<String, String> {
    fn param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Ordered query-string pairs.
///
/// Values are stored already URL-decoded, the way a router hands them
/// over. Repeated keys are kept; lookups return the first occurrence.
///
/// # Example
///
/// ```
/// use dealer_query::QueryParams;
///
/// let params = QueryParams::parse("?page=2&q=abc&page=3");
/// assert_eq!(params.get("page"), Some("2"));
/// assert_eq!(params.get("q"), Some("abc"));
/// assert!(!params.contains("sort"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (with or without the leading `?`).
    ///
    /// Uses `application/x-www-form-urlencoded` rules, so `+` becomes a
    /// space and percent-escapes are decoded once.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Append a pair, keeping existing values for the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Set a key, replacing every existing value for it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
    }

    /// Set the filter parameter to `token`, returning the container.
    pub fn with_filter(mut self, token: &QueryToken) -> Self {
        self.insert(FILTER_PARAM, token.as_str());
        self
    }

    /// Get the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Remove every value for `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the container has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize back into a query string (without the leading `?`).
    ///
    /// Values are form-urlencoded, so a filter token's own escapes survive
    /// a later [`QueryParams::parse`].
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

impl ParamSource for QueryParams {
    fn param(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

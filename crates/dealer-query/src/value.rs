//! # Filter values
//!
//! Search criteria have no fixed schema: the web client may send a make, a
//! price range, a nested location object, or anything else. The codec keeps
//! them opaque as a small recursive value type; only the listing handler
//! interprets field names.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single filter value.
///
/// Serialized untagged, so `FilterValue::String("Toyota")` is the JSON
/// string `"Toyota"` and a `Map` is a plain JSON object.
///
/// # Example
///
/// ```
/// use dealer_query::FilterValue;
///
/// let make = FilterValue::from("Toyota");
/// assert_eq!(make.as_str(), Some("Toyota"));
///
/// let price = FilterValue::from(500_000);
/// assert_eq!(price.as_i64(), Some(500_000));
///
/// assert!(FilterValue::from_f64(f64::NAN).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// JSON `null`
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer or finite float
    Number(Number),
    /// Text
    String(String),
    /// Sequence of values
    List(Vec<FilterValue>),
    /// Nested mapping
    Map(BTreeMap<String, FilterValue>),
}

impl FilterValue {
    /// Create a number value from a float.
    ///
    /// # Returns
    ///
    /// `None` for NaN and infinities, which have no JSON representation.
    pub fn from_f64(f: f64) -> Option<Self> {
        Number::from_f64(f).map(FilterValue::Number)
    }

    /// Check if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Get the string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the number as `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Get the number as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Get the elements, if this is a list.
    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries, if this is a nested mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FilterValue>> {
        match self {
            FilterValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(n: $t) -> Self {
                    FilterValue::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, FilterValue>> for FilterValue {
    fn from(map: BTreeMap<String, FilterValue>) -> Self {
        FilterValue::Map(map)
    }
}

impl From<FilterQuery> for FilterValue {
    fn from(query: FilterQuery) -> Self {
        FilterValue::Map(query.fields)
    }
}

/// Top-level search criteria carried by a filter token.
///
/// Keys are kept sorted, so two queries with the same entries always
/// encode to the same token regardless of insertion order.
///
/// # Example
///
/// ```
/// use dealer_query::FilterQuery;
///
/// let query = FilterQuery::new()
///     .with("make", "Toyota")
///     .with("priceMax", 500_000);
///
/// assert_eq!(query.len(), 2);
/// assert_eq!(query.get("make").and_then(|v| v.as_str()), Some("Toyota"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterQuery {
    fields: BTreeMap<String, FilterValue>,
}

impl FilterQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, returning the query.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Option<FilterValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.fields.get(key)
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.fields.remove(key)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the query has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FilterValue> {
        self.fields.iter()
    }

    /// Consume the query, returning its fields.
    pub fn into_inner(self) -> BTreeMap<String, FilterValue> {
        self.fields
    }
}

impl From<BTreeMap<String, FilterValue>> for FilterQuery {
    fn from(fields: BTreeMap<String, FilterValue>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterQuery {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for FilterQuery {
    type Item = (String, FilterValue);
    type IntoIter = btree_map::IntoIter<String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilterQuery {
    type Item = (&'a String, &'a FilterValue);
    type IntoIter = btree_map::Iter<'a, String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_serialization() {
        let query = FilterQuery::new()
            .with("make", "Toyota")
            .with("priceMax", 500_000)
            .with("certified", true)
            .with("colors", vec!["red", "black"])
            .with("trim", FilterValue::Null);

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "certified": true,
                "colors": ["red", "black"],
                "make": "Toyota",
                "priceMax": 500000,
                "trim": null
            })
        );
    }

    #[test]
    fn test_deserializes_every_shape() {
        let query: FilterQuery = serde_json::from_str(
            r#"{"a": null, "b": false, "c": -3, "d": 2.5, "e": "x", "f": [1, "y"], "g": {"h": {}}}"#,
        )
        .unwrap();

        assert!(query.get("a").unwrap().is_null());
        assert_eq!(query.get("b").unwrap().as_bool(), Some(false));
        assert_eq!(query.get("c").unwrap().as_i64(), Some(-3));
        assert_eq!(query.get("d").unwrap().as_f64(), Some(2.5));
        assert_eq!(query.get("e").unwrap().as_str(), Some("x"));
        assert_eq!(query.get("f").unwrap().as_list().map(|l| l.len()), Some(2));
        let nested = query.get("g").unwrap().as_map().unwrap();
        assert!(nested.get("h").unwrap().as_map().unwrap().is_empty());
    }

    #[test]
    fn test_nested_price_range() {
        let mut range = BTreeMap::new();
        range.insert("min".to_string(), FilterValue::from(100_000));
        range.insert("max".to_string(), FilterValue::from(250_000));
        let query = FilterQuery::new().with("price", range);

        let price = query.get("price").and_then(|v| v.as_map()).unwrap();
        assert_eq!(price.get("max").and_then(|v| v.as_i64()), Some(250_000));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: FilterQuery = vec![("make", "Honda"), ("model", "Civic")].into_iter().collect();
        let b: FilterQuery = vec![("model", "Civic"), ("make", "Honda")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_insert_and_remove() {
        let mut query = FilterQuery::new();
        assert!(query.insert("make", "Ford").is_none());
        assert_eq!(
            query.insert("make", "Kia").and_then(|v| v.as_str().map(String::from)),
            Some("Ford".to_string())
        );
        assert!(query.contains_key("make"));
        assert!(query.remove("make").is_some());
        assert!(query.is_empty());
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(FilterValue::from_f64(f64::INFINITY).is_none());
        assert_eq!(FilterValue::from_f64(1.5).and_then(|v| v.as_f64()), Some(1.5));
    }
}

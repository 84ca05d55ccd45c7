//! # Dealer Query
//!
//! Shareable, bookmarkable listing searches.
//!
//! ## Overview
//!
//! The dealer-query crate handles:
//! - **Filter values**: Schema-free search criteria as a recursive value type
//! - **Query tokens**: URL-safe encoding of a filter query for the `q` parameter
//! - **Parameter containers**: Parsing and building query strings
//!
//! ## Usage
//!
//! ```rust
//! use dealer_query::{FilterQuery, QueryParams, QueryTokenCodec};
//!
//! let codec = QueryTokenCodec::new();
//!
//! // Build a shareable link
//! let query = FilterQuery::new().with("make", "Toyota").with("priceMax", 500_000);
//! let token = codec.encode(&query).unwrap();
//! let link = format!("/cars?{}", QueryParams::new().with_filter(&token).to_query_string());
//!
//! // Read it back on the receiving request
//! let raw_query = link.split_once('?').map(|(_, q)| q).unwrap_or_default();
//! let params = QueryParams::parse(raw_query);
//! assert_eq!(codec.decode(&params), Some(query));
//!
//! // A tampered link degrades to "no filter"
//! assert_eq!(codec.decode(&QueryParams::parse("q=%25ZZ")), None);
//! ```
//!
//! ## Independence
//!
//! This crate knows nothing about users or permissions. Scoping a decoded
//! query to what the caller may see is done by `dealer-access`.

pub mod codec;
pub mod error;
pub mod params;
pub mod value;

// Re-export main types for convenience
pub use codec::{decode, encode, QueryToken, QueryTokenCodec, FILTER_PARAM};
pub use error::{CodecError, CodecResult};
pub use params::{ParamSource, QueryParams};
pub use value::{FilterQuery, FilterValue};

//! # Dealer Access
//!
//! Turns a listing request into an authorized, filtered query.
//!
//! ## Overview
//!
//! The dealer-access crate handles:
//! - **Users**: The session layer's user record (identity and role)
//! - **Configuration**: Role table location and filter token limits
//! - **Authorization**: Resolving the caller's visibility scope
//! - **Composition**: Merging the scope into the decoded search filter
//!
//! ## Flow
//!
//! ```text
//! User ----> PermissionResolver ----> VisibilityScope --+
//!                                                        +--> ScopedListingQuery
//! ?q=... --> QueryTokenCodec ------> FilterQuery -------+
//! ```
//!
//! A malformed `q` never fails the request: the search simply runs
//! unfiltered, still restricted to what the caller may see.
//!
//! ## Usage
//!
//! ```rust
//! use uuid::Uuid;
//! use dealer_access::{AccessConfig, ListingAccess, ListingScope, User};
//! use dealer_query::{FilterQuery, QueryParams};
//!
//! let access = ListingAccess::from_config(&AccessConfig::default()).unwrap();
//!
//! let link = access
//!     .share_url("/cars", &FilterQuery::new().with("make", "Toyota"))
//!     .unwrap();
//! let raw_query = link.split_once('?').map(|(_, q)| q).unwrap_or_default();
//!
//! let owner = User::new(Uuid::now_v7()).with_role("owner-tier");
//! let query = access
//!     .authorize(Some(&owner), &QueryParams::parse(raw_query))
//!     .unwrap();
//!
//! assert_eq!(query.scope, ListingScope::All);
//! assert_eq!(
//!     query.merged_filter().get("make").and_then(|v| v.as_str()),
//!     Some("Toyota")
//! );
//! ```

pub mod config;
pub mod error;
pub mod listing;
pub mod user;

// Re-export main types
pub use config::{AccessConfig, DEFAULT_MAX_FILTER_TOKEN_LEN};
pub use error::{AccessError, AccessResult};
pub use listing::{ListingAccess, ListingScope, ScopedListingQuery, OWNER_FIELD};
pub use user::User;

//! # Dealer RBAC
//!
//! Resolves an authenticated user's role into the visibility scope used
//! for listing queries.
//!
//! ## Overview
//!
//! The dealer-rbac crate handles:
//! - **Roles**: Opaque role identifiers issued by the session layer
//! - **Permission Sets**: The two-flag visibility record (`canViewAll`, `canViewOwn`)
//! - **Role Tables**: Immutable role → permission mappings loaded at startup
//! - **Resolution**: Total lookup from a user (or no user) to a permission set
//!
//! ## Architecture
//!
//! ```text
//! User --(role)--> Role --(RoleTable)--> PermissionSet --> VisibilityScope
//!
//! Unknown or missing roles fall through to the table's default record.
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use dealer_rbac::{PermissionResolver, PermissionSet, RoleTable, VisibilityScope};
//!
//! let resolver = PermissionResolver::new(Arc::new(RoleTable::builtin()));
//!
//! let owner = resolver.resolve_role(Some("owner-tier"));
//! assert_eq!(owner, PermissionSet::ALL_RECORDS);
//! assert_eq!(owner.scope(), VisibilityScope::AllRecords);
//!
//! // Unknown roles get the default record
//! let unknown = resolver.resolve_role(Some("nonexistent-role-xyz"));
//! assert_eq!(unknown, PermissionSet::OWN_RECORDS);
//! ```
//!
//! ## Extending
//!
//! Adding a role only requires a new table entry, either through
//! [`RoleTable::builder`] or a JSON role table file. Resolution never
//! special-cases role identifiers.

pub mod error;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod table;

// Re-export main types for convenience
pub use error::{RbacError, RbacResult};
pub use permissions::{PermissionSet, VisibilityScope};
pub use resolver::{resolve_permissions, PermissionResolver, RoleBearer};
pub use roles::Role;
pub use table::{RoleTable, RoleTableBuilder};

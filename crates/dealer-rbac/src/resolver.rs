//! # Permission resolution
//!
//! Maps a user (or the absence of one) to a [`PermissionSet`] using an
//! immutable [`RoleTable`]. Resolution is total: it never fails and never
//! returns a partial record.

use std::sync::Arc;

use crate::permissions::PermissionSet;
use crate::table::RoleTable;

/// Anything that carries an optional role identifier.
///
/// Only the role is consulted; all other user fields are ignored.
pub trait RoleBearer {
    /// The user's role, if any.
    fn role(&self) -> Option<&str>;
}

impl<T: RoleBearer + ?Sized> RoleBearer for &T {
    fn role(&self) -> Option<&str> {
        (**self).role()
    }
}

/// Resolves users to permission sets against a shared role table.
///
/// Cloning is cheap; clones share the same table.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dealer_rbac::{PermissionResolver, PermissionSet, RoleBearer, RoleTable};
///
/// struct Session {
///     role: Option<String>,
/// }
///
/// impl RoleBearer for Session {
///     fn role(&self) -> Option<&str> {
///         self.role.as_deref()
///     }
/// }
///
/// let resolver = PermissionResolver::new(Arc::new(RoleTable::builtin()));
/// let agent = Session { role: Some("agent-tier".to_string()) };
///
/// assert_eq!(resolver.resolve(Some(&agent)), PermissionSet::OWN_RECORDS);
/// assert_eq!(resolver.resolve::<Session>(None), PermissionSet::OWN_RECORDS);
/// ```
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    table: Arc<RoleTable>,
}

impl PermissionResolver {
    /// Create a resolver over a role table.
    pub fn new(table: Arc<RoleTable>) -> Self {
        Self { table }
    }

    /// Resolve a user's permissions.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user, or `None` for anonymous callers
    ///
    /// # Returns
    ///
    /// The role's permission set, or the table default when the user is
    /// absent, has no role, or has a role the table does not know.
    pub fn resolve<U: RoleBearer + ?Sized>(&self, user: Option<&U>) -> PermissionSet {
        self.resolve_role(user.and_then(|u| u.role()))
    }

    /// Resolve a bare role identifier.
    pub fn resolve_role(&self, role: Option<&str>) -> PermissionSet {
        role.and_then(|r| self.table.get(r))
            .unwrap_or_else(|| self.table.default_permissions())
    }

    /// The role table this resolver reads from.
    pub fn table(&self) -> &RoleTable {
        &self.table
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new(Arc::new(RoleTable::builtin()))
    }
}

/// Resolve a user's permissions against `table`.
pub fn resolve_permissions<U: RoleBearer + ?Sized>(table: &RoleTable, user: Option<&U>) -> PermissionSet {
    user.and_then(|u| u.role())
        .and_then(|r| table.get(r))
        .unwrap_or_else(|| table.default_permissions())
}

//! Role identifiers
//!
//! Roles are opaque strings issued by the session layer (e.g. `owner-tier`,
//! `agent-tier`). They are only ever used as keys into a [`RoleTable`].
//!
//! [`RoleTable`]: crate::table::RoleTable

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A user's position, as named by the session layer.
///
/// Identifiers compare exactly; `Owner-Tier` and `owner-tier` are
/// different roles.
///
/// # Examples
///
/// ```
/// use dealer_rbac::Role;
///
/// let role = Role::new("agent-tier");
/// assert_eq!(role.as_str(), "agent-tier");
/// assert_eq!(role.to_string(), "agent-tier");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Built-in role with visibility over every listing.
    pub const OWNER_TIER: &'static str = "owner-tier";

    /// Built-in role limited to the listings the caller owns.
    pub const AGENT_TIER: &'static str = "agent-tier";

    /// Create a role from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the role identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the role, returning its identifier.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_role_is_case_sensitive() {
        assert_ne!(Role::new("owner-tier"), Role::new("Owner-Tier"));
    }

    #[test]
    fn test_role_borrows_as_str_for_lookups() {
        let mut map = HashMap::new();
        map.insert(Role::new(Role::AGENT_TIER), 1);
        assert_eq!(map.get("agent-tier"), Some(&1));
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::new("owner-tier")).unwrap();
        assert_eq!(json, "\"owner-tier\"");

        let role: Role = serde_json::from_str("\"agent-tier\"").unwrap();
        assert_eq!(role.as_str(), Role::AGENT_TIER);
    }
}

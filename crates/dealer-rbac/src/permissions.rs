//! # Permissions
//!
//! The two-flag visibility record attached to every role, and the scope it
//! implies for listing queries.

use serde::{Deserialize, Serialize};

/// Listing visibility granted to a role.
///
/// Both flags are always present. The serialized form uses the field names
/// shared with the web client (`canViewAll`, `canViewOwn`).
///
/// # Example
///
/// ```
/// use dealer_rbac::{PermissionSet, VisibilityScope};
///
/// let perms = PermissionSet::new(false, true);
/// assert_eq!(perms, PermissionSet::OWN_RECORDS);
/// assert_eq!(perms.scope(), VisibilityScope::OwnRecords);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// May retrieve records regardless of ownership.
    pub can_view_all: bool,
    /// May retrieve records the caller owns.
    pub can_view_own: bool,
}

impl PermissionSet {
    /// Every record, owned or not.
    pub const ALL_RECORDS: Self = Self::new(true, true);

    /// Only the caller's own records.
    pub const OWN_RECORDS: Self = Self::new(false, true);

    /// Nothing at all.
    pub const NONE: Self = Self::new(false, false);

    /// Create a permission set from its two flags.
    pub const fn new(can_view_all: bool, can_view_own: bool) -> Self {
        Self {
            can_view_all,
            can_view_own,
        }
    }

    /// Get the listing scope these permissions allow.
    ///
    /// `can_view_all` wins over `can_view_own`.
    ///
    /// # Returns
    ///
    /// - `AllRecords` if `can_view_all` is set
    /// - `OwnRecords` if only `can_view_own` is set
    /// - `NoRecords` otherwise
    pub const fn scope(&self) -> VisibilityScope {
        if self.can_view_all {
            VisibilityScope::AllRecords
        } else if self.can_view_own {
            VisibilityScope::OwnRecords
        } else {
            VisibilityScope::NoRecords
        }
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::OWN_RECORDS
    }
}

/// Which rows a listing query may return.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityScope {
    /// No ownership restriction
    AllRecords,
    /// Restricted to records owned by the caller
    OwnRecords,
    /// No records are visible
    NoRecords,
}

impl VisibilityScope {
    /// Check whether any records are visible under this scope.
    pub fn allows_any(&self) -> bool {
        !matches!(self, VisibilityScope::NoRecords)
    }

    /// Get string representation of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllRecords => "all_records",
            Self::OwnRecords => "own_records",
            Self::NoRecords => "no_records",
        }
    }
}

impl std::fmt::Display for VisibilityScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_flags() {
        assert_eq!(PermissionSet::new(true, true).scope(), VisibilityScope::AllRecords);
        assert_eq!(PermissionSet::new(true, false).scope(), VisibilityScope::AllRecords);
        assert_eq!(PermissionSet::new(false, true).scope(), VisibilityScope::OwnRecords);
        assert_eq!(PermissionSet::new(false, false).scope(), VisibilityScope::NoRecords);
    }

    #[test]
    fn test_scope_allows_any() {
        assert!(VisibilityScope::AllRecords.allows_any());
        assert!(VisibilityScope::OwnRecords.allows_any());
        assert!(!VisibilityScope::NoRecords.allows_any());
    }

    #[test]
    fn test_default_is_own_records() {
        assert_eq!(PermissionSet::default(), PermissionSet::OWN_RECORDS);
    }

    #[test]
    fn test_permission_set_serializes_camel_case() {
        let json = serde_json::to_value(PermissionSet::ALL_RECORDS).unwrap();
        assert_eq!(json, serde_json::json!({"canViewAll": true, "canViewOwn": true}));

        let parsed: PermissionSet =
            serde_json::from_str(r#"{"canViewAll": false, "canViewOwn": true}"#).unwrap();
        assert_eq!(parsed, PermissionSet::OWN_RECORDS);
    }

    #[test]
    fn test_permission_set_requires_both_flags() {
        let result = serde_json::from_str::<PermissionSet>(r#"{"canViewAll": true}"#);
        assert!(result.is_err());
    }
}

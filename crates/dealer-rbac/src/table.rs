//! Role tables
//!
//! A [`RoleTable`] is the process-wide role → permission configuration.
//! It is built once at startup (from the builtin defaults, a builder, or a
//! JSON document) and never mutated afterwards; share it behind an `Arc`.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{RbacError, RbacResult};
use crate::permissions::PermissionSet;
use crate::roles::Role;

/// Immutable mapping from role to permission set, plus a default record.
///
/// # Examples
///
/// ```
/// use dealer_rbac::{PermissionSet, RoleTable};
///
/// let table = RoleTable::builder()
///     .with_role("regional-manager", PermissionSet::ALL_RECORDS)
///     .with_role("trainee", PermissionSet::NONE)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.get("trainee"), Some(PermissionSet::NONE));
/// assert_eq!(table.get("unknown"), None);
/// assert_eq!(table.default_permissions(), PermissionSet::OWN_RECORDS);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    roles: BTreeMap<Role, PermissionSet>,
    default: PermissionSet,
}

/// On-disk shape of a role table document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoleTableDocument {
    #[serde(default)]
    default: Option<PermissionSet>,
    #[serde(default)]
    roles: BTreeMap<String, PermissionSet>,
}

impl RoleTable {
    /// The dealership's standard roles.
    ///
    /// - `owner-tier`: all records
    /// - `agent-tier`: own records only
    /// - default: own records only
    pub fn builtin() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(Role::new(Role::OWNER_TIER), PermissionSet::ALL_RECORDS);
        roles.insert(Role::new(Role::AGENT_TIER), PermissionSet::OWN_RECORDS);
        Self {
            roles,
            default: PermissionSet::OWN_RECORDS,
        }
    }

    /// Start building a custom table. The default record starts as
    /// [`PermissionSet::OWN_RECORDS`].
    pub fn builder() -> RoleTableBuilder {
        RoleTableBuilder::default()
    }

    /// Parse a role table from JSON.
    ///
    /// ```json
    /// {
    ///   "default": { "canViewAll": false, "canViewOwn": true },
    ///   "roles": {
    ///     "owner-tier": { "canViewAll": true, "canViewOwn": true }
    ///   }
    /// }
    /// ```
    ///
    /// `default` may be omitted, in which case own-records visibility is used.
    ///
    /// # Errors
    ///
    /// `InvalidRoleTable` if the document is malformed, `EmptyRole` if a
    /// role key is empty.
    pub fn from_json(json: &str) -> RbacResult<Self> {
        let doc: RoleTableDocument =
            serde_json::from_str(json).map_err(|e| RbacError::InvalidRoleTable(e.to_string()))?;

        let mut builder = Self::builder();
        if let Some(default) = doc.default {
            builder = builder.with_default(default);
        }
        for (role, perms) in doc.roles {
            builder = builder.with_role(role, perms);
        }
        builder.build()
    }

    /// Look up the permissions of a known role.
    pub fn get(&self, role: &str) -> Option<PermissionSet> {
        self.roles.get(role).copied()
    }

    /// The record returned for unknown or missing roles.
    pub fn default_permissions(&self) -> PermissionSet {
        self.default
    }

    /// Iterate over the configured roles in identifier order.
    pub fn roles(&self) -> impl Iterator<Item = (&Role, &PermissionSet)> {
        self.roles.iter()
    }

    /// Number of configured roles (the default record is not counted).
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if no roles are configured.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder for [`RoleTable`].
#[derive(Debug, Clone)]
pub struct RoleTableBuilder {
    roles: BTreeMap<Role, PermissionSet>,
    default: PermissionSet,
    empty_role: bool,
}

impl Default for RoleTableBuilder {
    fn default() -> Self {
        Self {
            roles: BTreeMap::new(),
            default: PermissionSet::OWN_RECORDS,
            empty_role: false,
        }
    }
}

impl RoleTableBuilder {
    /// Add a role, replacing any earlier entry for the same identifier.
    pub fn with_role(mut self, role: impl Into<Role>, permissions: PermissionSet) -> Self {
        let role = role.into();
        if role.as_str().is_empty() {
            self.empty_role = true;
        }
        self.roles.insert(role, permissions);
        self
    }

    /// Set the record returned for unknown or missing roles.
    pub fn with_default(mut self, permissions: PermissionSet) -> Self {
        self.default = permissions;
        self
    }

    /// Freeze the table.
    ///
    /// # Errors
    ///
    /// `EmptyRole` if an empty role identifier was added.
    pub fn build(self) -> RbacResult<RoleTable> {
        if self.empty_role {
            return Err(RbacError::EmptyRole);
        }
        Ok(RoleTable {
            roles: self.roles,
            default: self.default,
        })
    }
}

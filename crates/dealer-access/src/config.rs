//! Access configuration.
//!
//! Read once at process start. Configuration is loaded from environment
//! variables with defaults suitable for local development; the role table
//! it produces is immutable for the life of the process.

use dealer_rbac::RoleTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AccessError, AccessResult};

/// Default cap on incoming filter token length, in bytes.
pub const DEFAULT_MAX_FILTER_TOKEN_LEN: usize = 8192;

/// Listing access configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessConfig {
    /// JSON role table file. `None` uses the builtin roles.
    pub role_table_path: Option<PathBuf>,

    /// Longest accepted filter token in bytes (0 disables the limit).
    pub max_filter_token_len: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role_table_path: None,
            max_filter_token_len: DEFAULT_MAX_FILTER_TOKEN_LEN,
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DEALER_ROLE_TABLE_PATH`: JSON role table file (default: builtin roles)
    /// - `DEALER_MAX_FILTER_TOKEN_LEN`: Filter token length cap in bytes (default: 8192)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            role_table_path: lookup("DEALER_ROLE_TABLE_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            max_filter_token_len: lookup("DEALER_MAX_FILTER_TOKEN_LEN")
                .and_then(|s| match s.trim().parse() {
                    Ok(n) => Some(n),
                    Err(e) => {
                        tracing::warn!(value = %s, error = %e, "Ignoring invalid DEALER_MAX_FILTER_TOKEN_LEN");
                        None
                    }
                })
                .unwrap_or(default.max_filter_token_len),
        }
    }

    /// Build the role table this configuration points at.
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read, `Rbac` if it is not a valid
    /// role table.
    pub fn load_role_table(&self) -> AccessResult<RoleTable> {
        let Some(path) = &self.role_table_path else {
            return Ok(RoleTable::builtin());
        };

        let json = std::fs::read_to_string(path).map_err(|e| {
            AccessError::Config(format!("cannot read role table {}: {e}", path.display()))
        })?;
        let table = RoleTable::from_json(&json)?;
        tracing::info!(path = %path.display(), roles = table.len(), "Loaded role table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_rbac::PermissionSet;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::now_v7(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AccessConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AccessConfig::default());
        assert_eq!(config.max_filter_token_len, 8192);
        assert_eq!(config.load_role_table().unwrap(), RoleTable::builtin());
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let config = AccessConfig::from_lookup(lookup(&[
            ("DEALER_ROLE_TABLE_PATH", "/etc/dealer/roles.json"),
            ("DEALER_MAX_FILTER_TOKEN_LEN", "1024"),
        ]));
        assert_eq!(config.role_table_path, Some(PathBuf::from("/etc/dealer/roles.json")));
        assert_eq!(config.max_filter_token_len, 1024);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AccessConfig::from_lookup(lookup(&[
            ("DEALER_ROLE_TABLE_PATH", "  "),
            ("DEALER_MAX_FILTER_TOKEN_LEN", "lots"),
        ]));
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn test_load_role_table_from_file() {
        let path = temp_file(
            "roles.json",
            r#"{"roles": {"sales-lead": {"canViewAll": true, "canViewOwn": true}}}"#,
        );
        let config = AccessConfig {
            role_table_path: Some(path.clone()),
            ..AccessConfig::default()
        };

        let table = config.load_role_table().unwrap();
        assert_eq!(table.get("sales-lead"), Some(PermissionSet::ALL_RECORDS));
        assert_eq!(table.get("owner-tier"), None);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_role_table_errors() {
        let missing = AccessConfig {
            role_table_path: Some(PathBuf::from("/nonexistent/dealer/roles.json")),
            ..AccessConfig::default()
        };
        assert!(matches!(missing.load_role_table(), Err(AccessError::Config(_))));

        let path = temp_file("bad-roles.json", "{");
        let invalid = AccessConfig {
            role_table_path: Some(path.clone()),
            ..AccessConfig::default()
        };
        assert!(matches!(invalid.load_role_table(), Err(AccessError::Rbac(_))));
        std::fs::remove_file(path).unwrap();
    }
}

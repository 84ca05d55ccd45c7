//! Authenticated user records
//!
//! The session layer issues these; this crate only reads the role and the
//! identity used for ownership scoping.

use dealer_rbac::RoleBearer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User as handed over by the session layer.
///
/// Extra fields in the session payload are ignored.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use dealer_access::User;
/// use dealer_rbac::RoleBearer;
///
/// let user = User::new(Uuid::now_v7()).with_role("agent-tier");
/// assert_eq!(user.role(), Some("agent-tier"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User ID; listings are owned by this ID
    pub id: Uuid,

    /// Role identifier, if the session carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Create a user with no role.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            role: None,
            email: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl RoleBearer for User {
    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_payload_ignores_extra_fields() {
        let id = Uuid::now_v7();
        let json = format!(
            r#"{{"id": "{id}", "role": "owner-tier", "name": "Dana", "avatar": null}}"#
        );
        let user: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(RoleBearer::role(&user), Some("owner-tier"));
        assert!(user.email.is_none());
    }

    #[test]
    fn test_role_is_optional() {
        let json = format!(r#"{{"id": "{}"}}"#, Uuid::now_v7());
        let user: User = serde_json::from_str(&json).unwrap();
        assert_eq!(RoleBearer::role(&user), None);
    }

    #[test]
    fn test_null_role_is_absent() {
        let json = format!(r#"{{"id": "{}", "role": null}}"#, Uuid::now_v7());
        let user: User = serde_json::from_str(&json).unwrap();
        assert!(user.role.is_none());
    }
}

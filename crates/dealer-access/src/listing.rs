//! Scoped listing queries
//!
//! Combines the caller's permission scope with the filter carried in the
//! request's `q` parameter. The result is what the listing handler hands
//! to the data store.

use dealer_query::{FilterQuery, ParamSource, QueryParams, QueryTokenCodec};
use dealer_rbac::{PermissionResolver, PermissionSet, VisibilityScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AccessConfig;
use crate::error::{AccessError, AccessResult};
use crate::user::User;

/// Listing field holding the owning user's ID.
pub const OWNER_FIELD: &str = "ownerId";

/// Ownership restriction applied to a listing query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "owner_id")]
pub enum ListingScope {
    /// Every listing
    All,
    /// Only listings owned by this user
    OwnedBy(Uuid),
}

/// An authorized, filtered listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedListingQuery {
    /// Permissions the scope was derived from
    pub permissions: PermissionSet,
    /// Ownership restriction
    pub scope: ListingScope,
    /// Search criteria from the request, if any were supplied and valid
    pub filter: Option<FilterQuery>,
}

impl ScopedListingQuery {
    /// The filter to send to the data store, with the ownership constraint
    /// applied.
    ///
    /// An `ownerId` supplied by the request is overwritten when the query is
    /// scoped, so a filter cannot widen the caller's visibility.
    pub fn merged_filter(&self) -> FilterQuery {
        let mut merged = self.filter.clone().unwrap_or_default();
        if let ListingScope::OwnedBy(owner) = self.scope {
            merged.insert(OWNER_FIELD, owner.to_string());
        }
        merged
    }

    /// Check whether the request carried search criteria.
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Check whether results are restricted by ownership.
    pub fn is_scoped(&self) -> bool {
        matches!(self.scope, ListingScope::OwnedBy(_))
    }
}

/// Authorizes listing requests.
///
/// Holds the process-wide resolver and codec; clone freely across request
/// handlers.
///
/// # Example
///
/// ```
/// use uuid::Uuid;
/// use dealer_access::{ListingAccess, ListingScope, User};
/// use dealer_query::QueryParams;
///
/// let access = ListingAccess::default();
/// let agent = User::new(Uuid::now_v7()).with_role("agent-tier");
///
/// let query = access.authorize(Some(&agent), &QueryParams::new()).unwrap();
/// assert_eq!(query.scope, ListingScope::OwnedBy(agent.id));
/// assert!(query.filter.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListingAccess {
    resolver: PermissionResolver,
    codec: QueryTokenCodec,
}

impl ListingAccess {
    /// Create from an existing resolver and codec.
    pub fn new(resolver: PermissionResolver, codec: QueryTokenCodec) -> Self {
        Self { resolver, codec }
    }

    /// Build from configuration, loading the role table.
    ///
    /// # Errors
    ///
    /// Propagates role table loading errors.
    pub fn from_config(config: &AccessConfig) -> AccessResult<Self> {
        let table = config.load_role_table()?;
        Ok(Self::new(
            PermissionResolver::new(Arc::new(table)),
            QueryTokenCodec::new().with_max_token_len(config.max_filter_token_len),
        ))
    }

    /// The permission resolver.
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// The filter token codec.
    pub fn codec(&self) -> &QueryTokenCodec {
        &self.codec
    }

    /// Authorize a listing request.
    ///
    /// A missing or malformed filter token yields an unfiltered query; only
    /// the permission scope can refuse the request.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user, or `None` for anonymous callers
    /// * `params` - The request's query-string parameters
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the scope is own-records and there is no user
    /// - `Forbidden` if the role grants no visibility
    pub fn authorize<P: ParamSource + ?Sized>(
        &self,
        user: Option<&User>,
        params: &P,
    ) -> AccessResult<ScopedListingQuery> {
        let permissions = self.resolver.resolve(user);

        let scope = match permissions.scope() {
            VisibilityScope::AllRecords => ListingScope::All,
            VisibilityScope::OwnRecords => match user {
                Some(u) => ListingScope::OwnedBy(u.id),
                None => return Err(AccessError::Unauthenticated),
            },
            VisibilityScope::NoRecords => return Err(AccessError::Forbidden),
        };

        let filter = self.codec.decode(params);

        tracing::debug!(
            user_id = ?user.map(|u| u.id),
            scope = %permissions.scope(),
            filtered = filter.is_some(),
            "Authorized listing query"
        );

        Ok(ScopedListingQuery {
            permissions,
            scope,
            filter,
        })
    }

    /// Build a shareable link for `query` under `base_path`.
    ///
    /// # Errors
    ///
    /// `Codec` if the query cannot be encoded.
    pub fn share_url(&self, base_path: &str, query: &FilterQuery) -> AccessResult<String> {
        let token = self.codec.encode(query)?;
        let params = QueryParams::new().with_filter(&token);
        Ok(format!("{}?{}", base_path, params.to_query_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_rbac::RoleTable;

    fn user(role: &str) -> User {
        User::new(Uuid::now_v7()).with_role(role)
    }

    #[test]
    fn test_anonymous_caller_needs_a_user_for_own_scope() {
        let access = ListingAccess::default();
        let result = access.authorize(None, &QueryParams::new());
        assert!(matches!(result, Err(AccessError::Unauthenticated)));
    }

    #[test]
    fn test_role_without_visibility_is_forbidden() {
        let table = RoleTable::builder()
            .with_role("suspended", PermissionSet::NONE)
            .build()
            .unwrap();
        let access = ListingAccess::new(
            PermissionResolver::new(Arc::new(table)),
            QueryTokenCodec::new(),
        );
        let result = access.authorize(Some(&user("suspended")), &QueryParams::new());
        assert!(matches!(result, Err(AccessError::Forbidden)));
    }

    #[test]
    fn test_anonymous_caller_with_public_default() {
        let table = RoleTable::builder()
            .with_default(PermissionSet::ALL_RECORDS)
            .build()
            .unwrap();
        let access = ListingAccess::new(
            PermissionResolver::new(Arc::new(table)),
            QueryTokenCodec::new(),
        );
        let query = access.authorize(None, &QueryParams::new()).unwrap();
        assert_eq!(query.scope, ListingScope::All);
        assert!(!query.is_scoped());
    }

    #[test]
    fn test_merged_filter_overrides_owner_field() {
        let agent = user("agent-tier");
        let query = ScopedListingQuery {
            permissions: PermissionSet::OWN_RECORDS,
            scope: ListingScope::OwnedBy(agent.id),
            filter: Some(FilterQuery::new().with(OWNER_FIELD, "someone-else").with("make", "Kia")),
        };

        let merged = query.merged_filter();
        let expected_owner = agent.id.to_string();
        assert_eq!(
            merged.get(OWNER_FIELD).and_then(|v| v.as_str()),
            Some(expected_owner.as_str())
        );
        assert_eq!(merged.get("make").and_then(|v| v.as_str()), Some("Kia"));
    }

    #[test]
    fn test_merged_filter_unscoped_keeps_filter() {
        let filter = FilterQuery::new().with("make", "Kia");
        let query = ScopedListingQuery {
            permissions: PermissionSet::ALL_RECORDS,
            scope: ListingScope::All,
            filter: Some(filter.clone()),
        };
        assert_eq!(query.merged_filter(), filter);

        let empty = ScopedListingQuery { filter: None, ..query };
        assert!(empty.merged_filter().is_empty());
    }

    #[test]
    fn test_from_config_applies_token_limit() {
        let config = AccessConfig {
            max_filter_token_len: 10,
            ..AccessConfig::default()
        };
        let access = ListingAccess::from_config(&config).unwrap();
        assert_eq!(access.codec().max_token_len(), Some(10));
        assert_eq!(access.resolver().table(), &RoleTable::builtin());
    }

    #[test]
    fn test_share_url() {
        let access = ListingAccess::default();
        let url = access
            .share_url("/cars", &FilterQuery::new().with("make", "Kia"))
            .unwrap();
        assert_eq!(url, "/cars?q=%257B%2522make%2522%253A%2522Kia%2522%257D");
    }

    #[test]
    fn test_listing_scope_serialization() {
        let id = Uuid::now_v7();
        assert_eq!(
            serde_json::to_value(ListingScope::OwnedBy(id)).unwrap(),
            serde_json::json!({"kind": "owned_by", "owner_id": id.to_string()})
        );
        assert_eq!(
            serde_json::to_value(ListingScope::All).unwrap(),
            serde_json::json!({"kind": "all"})
        );
    }
}

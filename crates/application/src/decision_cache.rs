use std::time::Duration;

use async_trait::async_trait;
use ringmate_core::{AppResult, UserId};
use ringmate_domain::{Permission, ResourceRef, Role, Subject, Verdict};

/// Cache key for one memoized verdict.
///
/// The key carries every input the verdict was derived from, including
/// the role: a role change produces a different key, so a stale grant for
/// the old role can never be served to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    user_id: UserId,
    role: Role,
    permission: Permission,
    resource: Option<ResourceRef>,
}

impl DecisionKey {
    /// Creates a key from one evaluation's inputs.
    #[must_use]
    pub fn new(subject: &Subject, permission: Permission, resource: Option<ResourceRef>) -> Self {
        Self {
            user_id: subject.user_id(),
            role: subject.role(),
            permission,
            resource,
        }
    }

    /// Returns the subject side of the key.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role the verdict was computed for.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the permission side of the key.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Returns the resource side of the key, if the evaluation was scoped.
    #[must_use]
    pub fn resource(&self) -> Option<ResourceRef> {
        self.resource
    }
}

/// Memoization port for verdicts.
///
/// A cached verdict must never outlive the relationship fact it was
/// derived from: the services mutating ownership or linkage publish
/// relationship events whose subscriber calls the targeted invalidation
/// methods below. TTL expiry is the correctness backstop against a missed
/// invalidation; invalidation is the only earlier removal path. The
/// authorizer itself never invalidates.
#[async_trait]
pub trait DecisionCache: Send + Sync {
    /// Returns the unexpired verdict for a key, if present.
    async fn get(&self, key: &DecisionKey) -> AppResult<Option<Verdict>>;

    /// Stores a verdict under a key for at most `ttl`.
    async fn put(&self, key: DecisionKey, verdict: Verdict, ttl: Duration) -> AppResult<()>;

    /// Drops every entry whose subject is the given user.
    async fn invalidate_for_user(&self, user_id: UserId) -> AppResult<()>;

    /// Drops every entry whose resource matches the given reference.
    async fn invalidate_for_resource(&self, resource: ResourceRef) -> AppResult<()>;

    /// Drops every entry. Used sparingly, for bulk administrative
    /// operations.
    async fn invalidate_all(&self) -> AppResult<()>;
}

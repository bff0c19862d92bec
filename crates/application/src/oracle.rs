use async_trait::async_trait;
use ringmate_core::{AppResult, BoxerId, UserId};
use ringmate_domain::{CoachPermission, ResourceRef};

/// Read-only query port answering relationship facts.
///
/// Backed by the persistence layer. Every query is a single indexed
/// lookup; the authorizer issues at most one relationship query per
/// scoped evaluation on a cache miss. A query error is an infrastructure
/// failure and is propagated, never folded into a verdict.
#[async_trait]
pub trait RelationshipOracle: Send + Sync {
    /// Returns whether the user owns the referenced resource.
    ///
    /// Ownership is resolved per resource kind: a boxer profile belongs
    /// to the user that registered it, a club to its owner, availability
    /// windows and match requests to the owner of the boxer they were
    /// created for.
    async fn is_owner(&self, user_id: UserId, resource: ResourceRef) -> AppResult<bool>;

    /// Returns the coach link level between a coach and a boxer, if any.
    async fn coach_link_level(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
    ) -> AppResult<Option<CoachPermission>>;

    /// Returns whether the user owns the club the boxer belongs to.
    async fn owns_club_of_boxer(&self, user_id: UserId, boxer_id: BoxerId) -> AppResult<bool>;

    /// Returns whether the user's account is active.
    async fn is_active(&self, user_id: UserId) -> AppResult<bool>;
}

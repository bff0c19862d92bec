use async_trait::async_trait;
use ringmate_core::AppResult;
use ringmate_domain::RelationshipEvent;

/// Publication port for relationship mutations.
///
/// Every service that changes ownership or linkage publishes the matching
/// event inside the same operation, before reporting success to its own
/// caller. Subscribers translate events into decision-cache invalidation.
#[async_trait]
pub trait RelationshipEventPublisher: Send + Sync {
    /// Publishes one relationship mutation.
    async fn publish(&self, event: RelationshipEvent) -> AppResult<()>;
}

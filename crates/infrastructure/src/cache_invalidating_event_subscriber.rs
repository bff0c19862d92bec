use std::sync::Arc;

use async_trait::async_trait;
use ringmate_application::{DecisionCache, RelationshipEventPublisher};
use ringmate_core::AppResult;
use ringmate_domain::{RelationshipEvent, ResourceRef};
use tracing::debug;

/// Translates relationship events into targeted decision-cache
/// invalidation.
///
/// Implements the publisher port directly, so wiring it as a service's
/// publisher guarantees invalidation happens inside the mutating
/// operation, before the service reports success. This is the only
/// component that calls the cache's invalidation methods.
#[derive(Clone)]
pub struct CacheInvalidatingEventSubscriber {
    cache: Arc<dyn DecisionCache>,
}

impl CacheInvalidatingEventSubscriber {
    /// Creates a subscriber over the decision cache to invalidate.
    #[must_use]
    pub fn new(cache: Arc<dyn DecisionCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RelationshipEventPublisher for CacheInvalidatingEventSubscriber {
    async fn publish(&self, event: RelationshipEvent) -> AppResult<()> {
        debug!(?event, "invalidating cached verdicts");

        match event {
            RelationshipEvent::CoachLinkChanged {
                coach_user_id,
                boxer_id,
            } => {
                self.cache.invalidate_for_user(coach_user_id).await?;
                self.cache
                    .invalidate_for_resource(ResourceRef::boxer(boxer_id))
                    .await
            }
            RelationshipEvent::ClubOwnershipTransferred {
                club_id,
                previous_owner,
                new_owner,
            } => {
                self.cache.invalidate_for_user(previous_owner).await?;
                self.cache.invalidate_for_user(new_owner).await?;
                self.cache
                    .invalidate_for_resource(ResourceRef::club(club_id))
                    .await
            }
            RelationshipEvent::ClubMemberChanged { club_id, boxer_id }
            | RelationshipEvent::BoxerReassigned { boxer_id, club_id } => {
                self.cache
                    .invalidate_for_resource(ResourceRef::club(club_id))
                    .await?;
                self.cache
                    .invalidate_for_resource(ResourceRef::boxer(boxer_id))
                    .await
            }
            RelationshipEvent::AccountStatusChanged { user_id } => {
                self.cache.invalidate_for_user(user_id).await
            }
        }
    }
}

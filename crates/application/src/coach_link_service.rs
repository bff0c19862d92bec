use std::sync::Arc;

use async_trait::async_trait;
use ringmate_core::{AppError, AppResult, BoxerId, UserId};
use ringmate_domain::{CoachPermission, RelationshipEvent, Role, Subject};

use crate::RelationshipEventPublisher;

/// Repository port for coach-boxer link mutations.
#[async_trait]
pub trait CoachLinkRepository: Send + Sync {
    /// Creates or re-levels the link between a coach and a boxer.
    async fn upsert_link(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
        level: CoachPermission,
    ) -> AppResult<()>;

    /// Removes the link, returning whether one existed.
    async fn remove_link(&self, coach_user_id: UserId, boxer_id: BoxerId) -> AppResult<bool>;

    /// Returns the current link level, if linked.
    async fn find_link_level(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
    ) -> AppResult<Option<CoachPermission>>;
}

/// Application service for coach-boxer linkage.
///
/// Links are self-service: the acting subject must be the coach side of
/// the link, or Admin. Every mutation publishes a
/// [`RelationshipEvent::CoachLinkChanged`] before reporting success, so
/// cached verdicts derived from the old link are dropped in the same
/// causal chain.
#[derive(Clone)]
pub struct CoachLinkService {
    repository: Arc<dyn CoachLinkRepository>,
    publisher: Arc<dyn RelationshipEventPublisher>,
}

impl CoachLinkService {
    /// Creates a service from its repository and event publisher.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CoachLinkRepository>,
        publisher: Arc<dyn RelationshipEventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Links a coach to a boxer at the given level.
    pub async fn link_boxer(
        &self,
        actor: &Subject,
        coach_user_id: UserId,
        boxer_id: BoxerId,
        level: CoachPermission,
    ) -> AppResult<()> {
        ensure_link_actor(actor, coach_user_id)?;

        self.repository
            .upsert_link(coach_user_id, boxer_id, level)
            .await?;

        self.publish_change(coach_user_id, boxer_id).await
    }

    /// Changes the level of an existing link.
    pub async fn update_link_level(
        &self,
        actor: &Subject,
        coach_user_id: UserId,
        boxer_id: BoxerId,
        level: CoachPermission,
    ) -> AppResult<()> {
        ensure_link_actor(actor, coach_user_id)?;

        if self
            .repository
            .find_link_level(coach_user_id, boxer_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "no coach link between user '{coach_user_id}' and boxer '{boxer_id}'"
            )));
        }

        self.repository
            .upsert_link(coach_user_id, boxer_id, level)
            .await?;

        self.publish_change(coach_user_id, boxer_id).await
    }

    /// Removes the link between a coach and a boxer.
    pub async fn unlink_boxer(
        &self,
        actor: &Subject,
        coach_user_id: UserId,
        boxer_id: BoxerId,
    ) -> AppResult<()> {
        ensure_link_actor(actor, coach_user_id)?;

        if !self.repository.remove_link(coach_user_id, boxer_id).await? {
            return Err(AppError::NotFound(format!(
                "no coach link between user '{coach_user_id}' and boxer '{boxer_id}'"
            )));
        }

        self.publish_change(coach_user_id, boxer_id).await
    }

    async fn publish_change(&self, coach_user_id: UserId, boxer_id: BoxerId) -> AppResult<()> {
        self.publisher
            .publish(RelationshipEvent::CoachLinkChanged {
                coach_user_id,
                boxer_id,
            })
            .await
    }
}

fn ensure_link_actor(actor: &Subject, coach_user_id: UserId) -> AppResult<()> {
    if actor.role() == Role::Admin {
        return Ok(());
    }
    if actor.role() == Role::Coach && actor.user_id() == coach_user_id {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "user '{}' may not manage coach links for user '{coach_user_id}'",
        actor.user_id()
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use ringmate_core::{AppError, AppResult, BoxerId, UserId};
    use ringmate_domain::{CoachPermission, RelationshipEvent, Role, Subject};

    use crate::RelationshipEventPublisher;

    use super::{CoachLinkRepository, CoachLinkService};

    #[derive(Default)]
    struct FakeCoachLinkRepository {
        links: Mutex<HashMap<(UserId, BoxerId), CoachPermission>>,
    }

    #[async_trait]
    impl CoachLinkRepository for FakeCoachLinkRepository {
        async fn upsert_link(
            &self,
            coach_user_id: UserId,
            boxer_id: BoxerId,
            level: CoachPermission,
        ) -> AppResult<()> {
            self.links
                .lock()
                .await
                .insert((coach_user_id, boxer_id), level);
            Ok(())
        }

        async fn remove_link(&self, coach_user_id: UserId, boxer_id: BoxerId) -> AppResult<bool> {
            Ok(self
                .links
                .lock()
                .await
                .remove(&(coach_user_id, boxer_id))
                .is_some())
        }

        async fn find_link_level(
            &self,
            coach_user_id: UserId,
            boxer_id: BoxerId,
        ) -> AppResult<Option<CoachPermission>> {
            Ok(self
                .links
                .lock()
                .await
                .get(&(coach_user_id, boxer_id))
                .copied())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<RelationshipEvent>>,
    }

    #[async_trait]
    impl RelationshipEventPublisher for RecordingPublisher {
        async fn publish(&self, event: RelationshipEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    fn service() -> (
        CoachLinkService,
        Arc<FakeCoachLinkRepository>,
        Arc<RecordingPublisher>,
    ) {
        let repository = Arc::new(FakeCoachLinkRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let service = CoachLinkService::new(repository.clone(), publisher.clone());
        (service, repository, publisher)
    }

    #[tokio::test]
    async fn linking_publishes_a_relationship_event() {
        let (service, _, publisher) = service();
        let coach_user_id = UserId::new();
        let actor = Subject::new(coach_user_id, Role::Coach);
        let boxer_id = BoxerId::new();

        let result = service
            .link_boxer(&actor, coach_user_id, boxer_id, CoachPermission::ViewProfile)
            .await;
        assert!(result.is_ok());

        let events = publisher.events.lock().await;
        assert_eq!(
            *events,
            vec![RelationshipEvent::CoachLinkChanged {
                coach_user_id,
                boxer_id,
            }]
        );
    }

    #[tokio::test]
    async fn another_coach_may_not_touch_the_link() {
        let (service, repository, publisher) = service();
        let actor = Subject::new(UserId::new(), Role::Coach);
        let coach_user_id = UserId::new();
        let boxer_id = BoxerId::new();

        let result = service
            .link_boxer(&actor, coach_user_id, boxer_id, CoachPermission::FullAccess)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(repository.links.lock().await.is_empty());
        assert!(publisher.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn admin_may_manage_any_link() {
        let (service, _, publisher) = service();
        let actor = Subject::new(UserId::new(), Role::Admin);
        let coach_user_id = UserId::new();
        let boxer_id = BoxerId::new();

        let result = service
            .link_boxer(&actor, coach_user_id, boxer_id, CoachPermission::ManageFights)
            .await;
        assert!(result.is_ok());
        assert_eq!(publisher.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn updating_a_missing_link_is_not_found_and_publishes_nothing() {
        let (service, _, publisher) = service();
        let coach_user_id = UserId::new();
        let actor = Subject::new(coach_user_id, Role::Coach);

        let result = service
            .update_link_level(
                &actor,
                coach_user_id,
                BoxerId::new(),
                CoachPermission::FullAccess,
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(publisher.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unlinking_publishes_after_removal() {
        let (service, repository, publisher) = service();
        let coach_user_id = UserId::new();
        let actor = Subject::new(coach_user_id, Role::Coach);
        let boxer_id = BoxerId::new();

        let linked = service
            .link_boxer(&actor, coach_user_id, boxer_id, CoachPermission::FullAccess)
            .await;
        assert!(linked.is_ok());

        let unlinked = service.unlink_boxer(&actor, coach_user_id, boxer_id).await;
        assert!(unlinked.is_ok());
        assert!(repository.links.lock().await.is_empty());
        assert_eq!(publisher.events.lock().await.len(), 2);
    }
}

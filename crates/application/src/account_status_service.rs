use std::sync::Arc;

use async_trait::async_trait;
use ringmate_core::{AppResult, UserId};
use ringmate_domain::{Permission, RelationshipEvent, Subject};

use crate::{RelationshipEventPublisher, ResourceAuthorizer};

/// Repository port for account activation state.
#[async_trait]
pub trait AccountStatusRepository: Send + Sync {
    /// Sets whether the account may authenticate and act.
    async fn set_active(&self, user_id: UserId, active: bool) -> AppResult<()>;
}

/// Application service for account activation toggles.
///
/// Guarded by the unscoped `account:status:any` permission, held only
/// through the Admin role's full-catalog grant. Publishes
/// [`RelationshipEvent::AccountStatusChanged`] so every cached verdict
/// for the affected user is dropped immediately rather than waiting out
/// its TTL.
#[derive(Clone)]
pub struct AccountStatusService {
    authorizer: ResourceAuthorizer,
    repository: Arc<dyn AccountStatusRepository>,
    publisher: Arc<dyn RelationshipEventPublisher>,
}

impl AccountStatusService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(
        authorizer: ResourceAuthorizer,
        repository: Arc<dyn AccountStatusRepository>,
        publisher: Arc<dyn RelationshipEventPublisher>,
    ) -> Self {
        Self {
            authorizer,
            repository,
            publisher,
        }
    }

    /// Activates or deactivates an account.
    pub async fn set_active(
        &self,
        actor: &Subject,
        user_id: UserId,
        active: bool,
    ) -> AppResult<()> {
        self.authorizer
            .require(actor, Permission::AccountStatusManage, None)
            .await?;

        self.repository.set_active(user_id, active).await?;

        self.publisher
            .publish(RelationshipEvent::AccountStatusChanged { user_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use ringmate_core::{AppError, AppResult, BoxerId, UserId};
    use ringmate_domain::{
        CoachPermission, RelationshipEvent, ResourceRef, Role, Subject, Verdict,
    };

    use crate::{
        DecisionCache, DecisionKey, RelationshipEventPublisher, RelationshipOracle,
        ResourceAuthorizer,
    };

    use super::{AccountStatusRepository, AccountStatusService};

    struct AllActiveOracle;

    #[async_trait]
    impl RelationshipOracle for AllActiveOracle {
        async fn is_owner(&self, _user_id: UserId, _resource: ResourceRef) -> AppResult<bool> {
            Ok(false)
        }

        async fn coach_link_level(
            &self,
            _coach_user_id: UserId,
            _boxer_id: BoxerId,
        ) -> AppResult<Option<CoachPermission>> {
            Ok(None)
        }

        async fn owns_club_of_boxer(
            &self,
            _user_id: UserId,
            _boxer_id: BoxerId,
        ) -> AppResult<bool> {
            Ok(false)
        }

        async fn is_active(&self, _user_id: UserId) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[derive(Default)]
    struct FakeDecisionCache {
        entries: Mutex<HashMap<DecisionKey, Verdict>>,
    }

    #[async_trait]
    impl DecisionCache for FakeDecisionCache {
        async fn get(&self, key: &DecisionKey) -> AppResult<Option<Verdict>> {
            Ok(self.entries.lock().await.get(key).copied())
        }

        async fn put(&self, key: DecisionKey, verdict: Verdict, _ttl: Duration) -> AppResult<()> {
            self.entries.lock().await.insert(key, verdict);
            Ok(())
        }

        async fn invalidate_for_user(&self, user_id: UserId) -> AppResult<()> {
            self.entries
                .lock()
                .await
                .retain(|key, _| key.user_id() != user_id);
            Ok(())
        }

        async fn invalidate_for_resource(&self, resource: ResourceRef) -> AppResult<()> {
            self.entries
                .lock()
                .await
                .retain(|key, _| key.resource() != Some(resource));
            Ok(())
        }

        async fn invalidate_all(&self) -> AppResult<()> {
            self.entries.lock().await.clear();
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAccountStatusRepository {
        states: Mutex<HashMap<UserId, bool>>,
    }

    #[async_trait]
    impl AccountStatusRepository for FakeAccountStatusRepository {
        async fn set_active(&self, user_id: UserId, active: bool) -> AppResult<()> {
            self.states.lock().await.insert(user_id, active);
            Ok(())
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
        AccountStatusService,
        Arc<FakeAccountStatusRepository>,
        Arc<RecordingPublisher>,
    ) {
        let authorizer = ResourceAuthorizer::new(
            Arc::new(AllActiveOracle),
            Arc::new(FakeDecisionCache::default()),
        );
        let repository = Arc::new(FakeAccountStatusRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let service = AccountStatusService::new(authorizer, repository.clone(), publisher.clone());
        (service, repository, publisher)
    }

    #[tokio::test]
    async fn admin_deactivates_an_account_and_event_is_published() {
        let (service, repository, publisher) = service();
        let admin = Subject::new(UserId::new(), Role::Admin);
        let user_id = UserId::new();

        let result = service.set_active(&admin, user_id, false).await;
        assert!(result.is_ok());
        assert_eq!(repository.states.lock().await.get(&user_id), Some(&false));

        let events = publisher.events.lock().await;
        assert_eq!(
            *events,
            vec![RelationshipEvent::AccountStatusChanged { user_id }]
        );
    }

    #[tokio::test]
    async fn non_admin_roles_are_forbidden() {
        let (service, repository, publisher) = service();
        let user_id = UserId::new();

        for role in [Role::Boxer, Role::Coach, Role::ClubManager] {
            let actor = Subject::new(UserId::new(), role);
            let result = service.set_active(&actor, user_id, false).await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }

        assert!(repository.states.lock().await.is_empty());
        assert!(publisher.events.lock().await.is_empty());
    }
}

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ringmate_application::{DecisionCache, DecisionKey};
use ringmate_core::{AppResult, UserId};
use ringmate_domain::{ResourceRef, Verdict};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct DecisionCacheEntry {
    verdict: Verdict,
    expires_at: Instant,
}

/// In-memory adapter for the decision cache port.
///
/// A single map behind an async `RwLock`: reads during a concurrent
/// invalidation observe the pre- or post-invalidation map, never a torn
/// entry. Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct InMemoryDecisionCache {
    entries: RwLock<HashMap<DecisionKey, DecisionCacheEntry>>,
}

impl InMemoryDecisionCache {
    /// Creates an empty in-memory decision cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionCache for InMemoryDecisionCache {
    async fn get(&self, key: &DecisionKey) -> AppResult<Option<Verdict>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.expires_at > Instant::now() {
                    return Ok(Some(entry.verdict));
                }
            } else {
                return Ok(None);
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn put(&self, key: DecisionKey, verdict: Verdict, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key, DecisionCacheEntry { verdict, expires_at });

        Ok(())
    }

    async fn invalidate_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.entries
            .write()
            .await
            .retain(|key, _| key.user_id() != user_id);

        Ok(())
    }

    async fn invalidate_for_resource(&self, resource: ResourceRef) -> AppResult<()> {
        self.entries
            .write()
            .await
            .retain(|key, _| key.resource() != Some(resource));

        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        self.entries.write().await.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ringmate_application::{DecisionCache, DecisionKey};
    use ringmate_core::{BoxerId, UserId};
    use ringmate_domain::{DenyReason, Permission, ResourceRef, Role, Subject, Verdict};

    use super::InMemoryDecisionCache;

    fn key_for(subject: &Subject, resource: Option<ResourceRef>) -> DecisionKey {
        DecisionKey::new(subject, Permission::BoxerUpdateOwn, resource)
    }

    #[tokio::test]
    async fn stores_and_returns_a_verdict() {
        let cache = InMemoryDecisionCache::new();
        let subject = Subject::new(UserId::new(), Role::Boxer);
        let key = key_for(&subject, Some(ResourceRef::boxer(BoxerId::new())));

        let stored = cache.put(key, Verdict::Allow, Duration::from_secs(60)).await;
        assert!(stored.is_ok());
        assert_eq!(cache.get(&key).await.unwrap_or(None), Some(Verdict::Allow));
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = InMemoryDecisionCache::new();
        let subject = Subject::new(UserId::new(), Role::Boxer);
        let key = key_for(&subject, None);

        let stored = cache.put(key, Verdict::Allow, Duration::ZERO).await;
        assert!(stored.is_ok());
        assert_eq!(cache.get(&key).await.unwrap_or(None), None);
    }

    #[tokio::test]
    async fn expired_entries_are_not_served() {
        let cache = InMemoryDecisionCache::new();
        let subject = Subject::new(UserId::new(), Role::Boxer);
        let key = key_for(&subject, None);

        let stored = cache
            .put(key, Verdict::Allow, Duration::from_millis(10))
            .await;
        assert!(stored.is_ok());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get(&key).await.unwrap_or(Some(Verdict::Allow)), None);
    }

    #[tokio::test]
    async fn user_invalidation_drops_only_that_user() {
        let cache = InMemoryDecisionCache::new();
        let first = Subject::new(UserId::new(), Role::Boxer);
        let second = Subject::new(UserId::new(), Role::Boxer);
        let first_key = key_for(&first, None);
        let second_key = key_for(&second, None);

        for key in [first_key, second_key] {
            let stored = cache
                .put(
                    key,
                    Verdict::Deny(DenyReason::RoleDenied),
                    Duration::from_secs(60),
                )
                .await;
            assert!(stored.is_ok());
        }

        let invalidated = cache.invalidate_for_user(first.user_id()).await;
        assert!(invalidated.is_ok());

        assert_eq!(cache.get(&first_key).await.unwrap_or(None), None);
        assert_eq!(
            cache.get(&second_key).await.unwrap_or(None),
            Some(Verdict::Deny(DenyReason::RoleDenied))
        );
    }

    #[tokio::test]
    async fn resource_invalidation_drops_every_touching_entry() {
        let cache = InMemoryDecisionCache::new();
        let subject = Subject::new(UserId::new(), Role::Coach);
        let resource = ResourceRef::boxer(BoxerId::new());
        let scoped = DecisionKey::new(&subject, Permission::BoxerUpdateLinked, Some(resource));
        let unscoped = DecisionKey::new(&subject, Permission::BoxerViewAny, None);

        for key in [scoped, unscoped] {
            let stored = cache.put(key, Verdict::Allow, Duration::from_secs(60)).await;
            assert!(stored.is_ok());
        }

        let invalidated = cache.invalidate_for_resource(resource).await;
        assert!(invalidated.is_ok());

        assert_eq!(cache.get(&scoped).await.unwrap_or(None), None);
        assert_eq!(
            cache.get(&unscoped).await.unwrap_or(None),
            Some(Verdict::Allow)
        );
    }

    #[tokio::test]
    async fn concurrent_reads_and_invalidation_stay_consistent() {
        let cache = Arc::new(InMemoryDecisionCache::new());
        let subject = Subject::new(UserId::new(), Role::Boxer);
        let key = key_for(&subject, Some(ResourceRef::boxer(BoxerId::new())));

        let stored = cache.put(key, Verdict::Allow, Duration::from_secs(60)).await;
        assert!(stored.is_ok());

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    // Every observation is either the stored allow or a
                    // clean miss.
                    let observed = cache.get(&key).await.unwrap_or(None);
                    assert!(observed.is_none() || observed == Some(Verdict::Allow));
                }
            }));
        }
        let invalidator = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.invalidate_for_user(subject.user_id()).await })
        };

        for task in tasks {
            assert!(task.await.is_ok());
        }
        assert!(matches!(invalidator.await, Ok(Ok(()))));
        assert_eq!(cache.get(&key).await.unwrap_or(Some(Verdict::Allow)), None);
    }
}

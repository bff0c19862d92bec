//! Redis-backed decision cache.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use ringmate_application::{DecisionCache, DecisionKey};
use ringmate_core::{AppError, AppResult, UserId};
use ringmate_domain::{DenyReason, ResourceRef, Verdict};

/// Redis implementation of the decision cache port.
///
/// Each verdict lives under its own key; per-user and per-resource index
/// sets record which verdict keys a targeted invalidation must delete.
/// Index sets carry the same TTL as the entries they track, so a dead
/// index never outlives its last live entry by more than one TTL.
#[derive(Clone)]
pub struct RedisDecisionCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisDecisionCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }

    fn entry_key(&self, key: &DecisionKey) -> String {
        let resource = match key.resource() {
            Some(resource) => resource.to_string(),
            None => "none".to_owned(),
        };

        format!(
            "{}:verdict:user={}:role={}:permission={}:resource={resource}",
            self.key_prefix,
            key.user_id(),
            key.role().as_str(),
            key.permission().as_str(),
        )
    }

    fn user_index_key(&self, user_id: UserId) -> String {
        format!("{}:index:user:{user_id}", self.key_prefix)
    }

    fn resource_index_key(&self, resource: ResourceRef) -> String {
        format!("{}:index:resource:{resource}", self.key_prefix)
    }

    fn encode_verdict(verdict: Verdict) -> String {
        match verdict {
            Verdict::Allow => "allow".to_owned(),
            Verdict::Deny(reason) => format!("deny:{}", reason.as_str()),
        }
    }

    fn decode_verdict(value: &str) -> AppResult<Verdict> {
        if value == "allow" {
            return Ok(Verdict::Allow);
        }

        match value.strip_prefix("deny:") {
            Some(reason) => Ok(Verdict::Deny(DenyReason::from_str(reason).map_err(
                |error| AppError::Internal(format!("invalid cached verdict '{value}': {error}")),
            )?)),
            None => Err(AppError::Internal(format!(
                "invalid cached verdict '{value}'"
            ))),
        }
    }

    async fn drop_indexed_entries(&self, index_key: String) -> AppResult<()> {
        let mut connection = self.connection().await?;

        let members: Vec<String> = connection.smembers(index_key.as_str()).await.map_err(
            |error| AppError::Internal(format!("failed to read decision cache index: {error}")),
        )?;

        if !members.is_empty() {
            let _: () = connection.del(members).await.map_err(|error| {
                AppError::Internal(format!("failed to drop decision cache entries: {error}"))
            })?;
        }

        let _: () = connection.del(index_key).await.map_err(|error| {
            AppError::Internal(format!("failed to drop decision cache index: {error}"))
        })?;

        Ok(())
    }
}

#[async_trait]
impl DecisionCache for RedisDecisionCache {
    async fn get(&self, key: &DecisionKey) -> AppResult<Option<Verdict>> {
        let mut connection = self.connection().await?;

        let encoded: Option<String> =
            connection.get(self.entry_key(key)).await.map_err(|error| {
                AppError::Internal(format!("failed to read decision cache entry: {error}"))
            })?;

        encoded.as_deref().map(Self::decode_verdict).transpose()
    }

    async fn put(&self, key: DecisionKey, verdict: Verdict, ttl: Duration) -> AppResult<()> {
        let ttl_seconds = ttl.as_secs();
        if ttl_seconds == 0 {
            return Ok(());
        }

        let entry_key = self.entry_key(&key);
        let mut connection = self.connection().await?;

        let _: () = connection
            .set_ex(
                entry_key.as_str(),
                Self::encode_verdict(verdict),
                ttl_seconds,
            )
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to write decision cache entry: {error}"))
            })?;

        let mut index_keys = vec![self.user_index_key(key.user_id())];
        if let Some(resource) = key.resource() {
            index_keys.push(self.resource_index_key(resource));
        }

        for index_key in index_keys {
            let _: () = connection
                .sadd(index_key.as_str(), entry_key.as_str())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to index decision cache entry: {error}"))
                })?;
            let _: () = connection
                .expire(index_key.as_str(), ttl_seconds.cast_signed())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to expire decision cache index: {error}"))
                })?;
        }

        Ok(())
    }

    async fn invalidate_for_user(&self, user_id: UserId) -> AppResult<()> {
        self.drop_indexed_entries(self.user_index_key(user_id)).await
    }

    async fn invalidate_for_resource(&self, resource: ResourceRef) -> AppResult<()> {
        self.drop_indexed_entries(self.resource_index_key(resource))
            .await
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        let mut connection = self.connection().await?;

        let keys: Vec<String> = {
            let mut iterator = connection
                .scan_match::<_, String>(format!("{}:*", self.key_prefix))
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to scan decision cache keys: {error}"))
                })?;

            let mut keys = Vec::new();
            while let Some(key) = iterator.next_item().await {
                let key = key.map_err(|error| {
                    AppError::Internal(format!("failed to scan decision cache keys: {error}"))
                })?;
                keys.push(key);
            }
            keys
        };

        if keys.is_empty() {
            return Ok(());
        }

        let mut connection = self.connection().await?;
        let _: () = connection.del(keys).await.map_err(|error| {
            AppError::Internal(format!("failed to flush decision cache: {error}"))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ringmate_domain::{DenyReason, Verdict};

    use super::RedisDecisionCache;

    #[test]
    fn verdict_encoding_roundtrips() {
        for verdict in [
            Verdict::Allow,
            Verdict::Deny(DenyReason::RoleDenied),
            Verdict::Deny(DenyReason::OverrideDenied),
        ] {
            let decoded = RedisDecisionCache::decode_verdict(
                RedisDecisionCache::encode_verdict(verdict).as_str(),
            );
            assert!(matches!(decoded, Ok(value) if value == verdict));
        }
    }

    #[test]
    fn garbage_cache_values_are_rejected() {
        assert!(RedisDecisionCache::decode_verdict("maybe").is_err());
        assert!(RedisDecisionCache::decode_verdict("deny:no_such_reason").is_err());
    }
}

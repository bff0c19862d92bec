//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod cache_invalidating_event_subscriber;
mod in_memory_decision_cache;
mod in_memory_relationship_oracle;
mod postgres_account_status_repository;
mod postgres_club_repository;
mod postgres_coach_link_repository;
mod postgres_relationship_oracle;
mod redis_decision_cache;

pub use cache_invalidating_event_subscriber::CacheInvalidatingEventSubscriber;
pub use in_memory_decision_cache::InMemoryDecisionCache;
pub use in_memory_relationship_oracle::InMemoryRelationshipOracle;
pub use postgres_account_status_repository::PostgresAccountStatusRepository;
pub use postgres_club_repository::PostgresClubRepository;
pub use postgres_coach_link_repository::PostgresCoachLinkRepository;
pub use postgres_relationship_oracle::PostgresRelationshipOracle;
pub use redis_decision_cache::RedisDecisionCache;

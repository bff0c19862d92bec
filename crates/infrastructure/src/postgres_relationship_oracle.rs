use std::str::FromStr;

use async_trait::async_trait;

use ringmate_application::RelationshipOracle;
use ringmate_core::{AppError, AppResult, BoxerId, UserId};
use ringmate_domain::{CoachPermission, ResourceKind, ResourceRef};

use sqlx::PgPool;

/// PostgreSQL-backed relationship fact queries.
///
/// Every method is one indexed query; the authorizer relies on that to
/// keep scoped evaluations at a single round trip on cache miss.
#[derive(Clone)]
pub struct PostgresRelationshipOracle {
    pool: PgPool,
}

impl PostgresRelationshipOracle {
    /// Creates an oracle with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipOracle for PostgresRelationshipOracle {
    async fn is_owner(&self, user_id: UserId, resource: ResourceRef) -> AppResult<bool> {
        let query = match resource.kind() {
            ResourceKind::Boxer => {
                "SELECT EXISTS(SELECT 1 FROM boxers WHERE id = $1 AND owner_user_id = $2)"
            }
            ResourceKind::Club => {
                "SELECT EXISTS(SELECT 1 FROM clubs WHERE id = $1 AND owner_user_id = $2)"
            }
            ResourceKind::Availability => {
                "SELECT EXISTS(
                    SELECT 1
                    FROM availability_windows AS windows
                    INNER JOIN boxers ON boxers.id = windows.boxer_id
                    WHERE windows.id = $1 AND boxers.owner_user_id = $2
                )"
            }
            ResourceKind::MatchRequest => {
                "SELECT EXISTS(
                    SELECT 1
                    FROM match_requests AS requests
                    INNER JOIN boxers ON boxers.id = requests.requester_boxer_id
                    WHERE requests.id = $1 AND boxers.owner_user_id = $2
                )"
            }
        };

        sqlx::query_scalar::<_, bool>(query)
            .bind(resource.id())
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to resolve ownership of '{resource}': {error}"
                ))
            })
    }

    async fn coach_link_level(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
    ) -> AppResult<Option<CoachPermission>> {
        let level = sqlx::query_scalar::<_, String>(
            r#"
            SELECT permission_level
            FROM coach_boxer_links
            WHERE coach_user_id = $1 AND boxer_id = $2
            "#,
        )
        .bind(coach_user_id.as_uuid())
        .bind(boxer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load coach link: {error}")))?;

        level
            .map(|value| {
                CoachPermission::from_str(value.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode coach permission '{value}': {error}"
                    ))
                })
            })
            .transpose()
    }

    async fn owns_club_of_boxer(&self, user_id: UserId, boxer_id: BoxerId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM boxers
                INNER JOIN clubs ON clubs.id = boxers.club_id
                WHERE boxers.id = $1 AND clubs.owner_user_id = $2
            )
            "#,
        )
        .bind(boxer_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve club ownership: {error}")))
    }

    async fn is_active(&self, user_id: UserId) -> AppResult<bool> {
        let active = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load account status: {error}")))?;

        // An unknown user is treated as inactive.
        Ok(active.unwrap_or(false))
    }
}

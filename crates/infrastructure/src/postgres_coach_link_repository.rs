use std::str::FromStr;

use async_trait::async_trait;

use ringmate_application::CoachLinkRepository;
use ringmate_core::{AppError, AppResult, BoxerId, UserId};
use ringmate_domain::CoachPermission;

use sqlx::PgPool;

/// PostgreSQL-backed repository for coach-boxer links.
#[derive(Clone)]
pub struct PostgresCoachLinkRepository {
    pool: PgPool,
}

impl PostgresCoachLinkRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoachLinkRepository for PostgresCoachLinkRepository {
    async fn upsert_link(
        &self,
        coach_user_id: UserId,
        boxer_id: BoxerId,
        level: CoachPermission,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO coach_boxer_links (coach_user_id, boxer_id, permission_level)
            VALUES ($1, $2, $3)
            ON CONFLICT (coach_user_id, boxer_id)
                DO UPDATE SET permission_level = EXCLUDED.permission_level
            "#,
        )
        .bind(coach_user_id.as_uuid())
        .bind(boxer_id.as_uuid())
        .bind(level.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to upsert coach link: {error}")))?;

        Ok(())
    }

    async fn remove_link(&self, coach_user_id: UserId, boxer_id: BoxerId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM coach_boxer_links
            WHERE coach_user_id = $1 AND boxer_id = $2
            "#,
        )
        .bind(coach_user_id.as_uuid())
        .bind(boxer_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove coach link: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_link_level(
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
}

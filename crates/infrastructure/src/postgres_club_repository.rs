use async_trait::async_trait;

use ringmate_application::ClubRepository;
use ringmate_core::{AppError, AppResult, BoxerId, ClubId, UserId};

use sqlx::PgPool;

/// PostgreSQL-backed repository for club rosters and ownership.
///
/// Membership is the `boxers.club_id` column (a boxer belongs to at most
/// one club), matching the join the relationship oracle resolves
/// club-owner scope with.
#[derive(Clone)]
pub struct PostgresClubRepository {
    pool: PgPool,
}

impl PostgresClubRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubRepository for PostgresClubRepository {
    async fn add_member(&self, club_id: ClubId, boxer_id: BoxerId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE boxers
            SET club_id = $1
            WHERE id = $2
            "#,
        )
        .bind(club_id.as_uuid())
        .bind(boxer_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to add club member: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("unknown boxer '{boxer_id}'")));
        }

        Ok(())
    }

    async fn remove_member(&self, club_id: ClubId, boxer_id: BoxerId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE boxers
            SET club_id = NULL
            WHERE id = $1 AND club_id = $2
            "#,
        )
        .bind(boxer_id.as_uuid())
        .bind(club_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove club member: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_owner(&self, club_id: ClubId) -> AppResult<Option<UserId>> {
        let owner = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT owner_user_id
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(club_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load club owner: {error}")))?;

        Ok(owner.map(UserId::from_uuid))
    }

    async fn set_owner(&self, club_id: ClubId, new_owner: UserId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE clubs
            SET owner_user_id = $1
            WHERE id = $2
            "#,
        )
        .bind(new_owner.as_uuid())
        .bind(club_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to set club owner: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("unknown club '{club_id}'")));
        }

        Ok(())
    }

    async fn assign_boxer_club(&self, boxer_id: BoxerId, club_id: ClubId) -> AppResult<()> {
        self.add_member(club_id, boxer_id).await
    }
}

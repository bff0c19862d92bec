use async_trait::async_trait;

use ringmate_application::AccountStatusRepository;
use ringmate_core::{AppError, AppResult, UserId};

use sqlx::PgPool;

/// PostgreSQL-backed repository for account activation state.
#[derive(Clone)]
pub struct PostgresAccountStatusRepository {
    pool: PgPool,
}

impl PostgresAccountStatusRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStatusRepository for PostgresAccountStatusRepository {
    async fn set_active(&self, user_id: UserId, active: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = $1
            WHERE id = $2
            "#,
        )
        .bind(active)
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to set account status: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("unknown user '{user_id}'")));
        }

        Ok(())
    }
}

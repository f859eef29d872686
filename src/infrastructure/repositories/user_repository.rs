//! User Directory Implementation
//!
//! Resolves display names from the local `chat_users` projection.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{User, UserDirectory, UserId};
use crate::infrastructure::database::{from_db_id, to_db_id};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
}

/// PostgreSQL-backed user directory.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn resolve(&self, ids: &[UserId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<i64> = ids.iter().copied().map(to_db_id).collect();

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username
            FROM chat_users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&keys)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| User::new(from_db_id(r.id), r.username))
            .collect())
    }
}

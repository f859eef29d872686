//! Room Repository Implementation
//!
//! PostgreSQL implementation of the RoomRepository trait.
//! Handles rooms and their membership rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewRoom, Room, RoomId, RoomRepository, User, UserId};
use crate::infrastructure::database::{from_db_id, to_db_id};
use crate::shared::error::AppError;

/// Database row representation matching the rooms table schema.
#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl RoomRow {
    fn into_room(self) -> Room {
        Room {
            id: from_db_id(self.id),
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL room repository implementation.
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a foreign key violation on `room_members.room_id` to a missing room.
fn missing_room(room_id: RoomId) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::NotFound(format!("Room {} not found", room_id))
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT id, name, created_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(to_db_id(id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_room()))
    }

    /// Insert the room and its memberships in one transaction.
    ///
    /// The transaction is rolled back on drop if any statement fails, so a
    /// room without members is never visible.
    async fn create_with_members(&self, room: &NewRoom) -> Result<Room, AppError> {
        if room.member_ids.is_empty() {
            return Err(AppError::Internal("room must have at least one member".into()));
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            INSERT INTO rooms (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&room.name)
        .fetch_one(&mut *tx)
        .await?;

        let member_ids: Vec<i64> = room.member_ids.iter().copied().map(to_db_id).collect();

        sqlx::query(
            r#"
            INSERT INTO room_members (room_id, user_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(row.id)
        .bind(&member_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_room())
    }

    async fn add_member(&self, room_id: RoomId, user: &User) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO room_members (room_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(to_db_id(room_id))
        .bind(to_db_id(user.id))
        .execute(&mut *tx)
        .await
        .map_err(missing_room(room_id))?;

        if user.has_username() {
            sqlx::query(
                r#"
                INSERT INTO chat_users (id, username)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE
                SET username = EXCLUDED.username, updated_at = NOW()
                "#,
            )
            .bind(to_db_id(user.id))
            .bind(&user.username)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM room_members
                WHERE room_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(to_db_id(room_id))
        .bind(to_db_id(user_id))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn member_ids(&self, room_id: RoomId) -> Result<Vec<UserId>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id FROM room_members
            WHERE room_id = $1
            ORDER BY joined_at ASC, user_id ASC
            "#,
        )
        .bind(to_db_id(room_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(from_db_id).collect())
    }
}

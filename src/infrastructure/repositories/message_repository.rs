//! Message Repository Implementation
//!
//! PostgreSQL implementation of message operations: per-room serialised
//! appends and offset pagination in send order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{AppendedMessage, Message, MessageId, MessageRepository, NewMessage, RoomId};
use crate::infrastructure::database::{from_db_id, to_db_id};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for message queries.
/// Maps to the messages table schema defined in the migration.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    room_id: i64,
    sender_id: i64,
    content: String,
    attachment_url: Option<String>,
    reply_to: Option<i64>,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl MessageRow {
    /// Converts database row to domain Message entity.
    fn into_message(self) -> Message {
        Message {
            id: from_db_id(self.id),
            room_id: from_db_id(self.room_id),
            sender_id: from_db_id(self.sender_id),
            content: self.content,
            attachment_url: self.attachment_url,
            reply_to: self.reply_to.map(from_db_id),
            sent_at: self.sent_at,
            read_at: self.read_at,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, room_id, sender_id, content, attachment_url,
                   reply_to, sent_at, read_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(to_db_id(id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_message()))
    }

    /// Append a message to a room.
    ///
    /// The room row is locked for the duration of the transaction, so appends
    /// to one room are serialised: the ID drawn from the sequence and the
    /// `sent_at` watermark both follow commit order. `sent_at` is the later of
    /// the wall clock and one microsecond past the room's previous message.
    async fn append(&self, message: &NewMessage) -> Result<AppendedMessage, AppError> {
        let room_id = to_db_id(message.room_id);
        let sender_id = to_db_id(message.sender_id);

        let mut tx = self.pool.begin().await?;

        let watermark = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            SELECT last_message_at FROM rooms
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(room_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(last_message_at) = watermark else {
            return Err(AppError::NotFound(format!("Room {} not found", message.room_id)));
        };

        if let Some(key) = &message.idempotency_key {
            let existing = sqlx::query_as::<_, MessageRow>(
                r#"
                SELECT id, room_id, sender_id, content, attachment_url,
                       reply_to, sent_at, read_at
                FROM messages
                WHERE room_id = $1 AND sender_id = $2 AND idempotency_key = $3
                "#,
            )
            .bind(room_id)
            .bind(sender_id)
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = existing {
                tx.commit().await?;
                return Ok(AppendedMessage {
                    message: row.into_message(),
                    replayed: true,
                });
            }
        }

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages
                (room_id, sender_id, content, attachment_url, reply_to, idempotency_key, sent_at)
            VALUES
                ($1, $2, $3, $4, $5, $6,
                 GREATEST(clock_timestamp(),
                          COALESCE($7, '-infinity'::timestamptz) + INTERVAL '1 microsecond'))
            RETURNING id, room_id, sender_id, content, attachment_url,
                      reply_to, sent_at, read_at
            "#,
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(&message.content)
        .bind(&message.attachment_url)
        .bind(message.reply_to.map(to_db_id))
        .bind(&message.idempotency_key)
        .bind(last_message_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE rooms SET last_message_at = $2 WHERE id = $1")
            .bind(room_id)
            .bind(row.sent_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AppendedMessage {
            message: row.into_message(),
            replayed: false,
        })
    }

    async fn count_by_room(&self, room_id: RoomId) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE room_id = $1")
            .bind(to_db_id(room_id))
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Messages are returned oldest first.
    async fn find_page(
        &self,
        room_id: RoomId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, room_id, sender_id, content, attachment_url,
                   reply_to, sent_at, read_at
            FROM messages
            WHERE room_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(to_db_id(room_id))
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }
}

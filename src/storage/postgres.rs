use crate::domain::message::{AudioFile, MessageSummary, NewMessage};
use crate::error::Result;
use crate::storage::records::message::{AudioRow, SummaryRow};
use crate::storage::{DbPool, MessageStore};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct PgMessageStore {
    pool: DbPool,
}

impl PgMessageStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for PgMessageStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, message: NewMessage) -> Result<String> {
        let (id,): (Uuid,) = sqlx::query_as(
            r"
            INSERT INTO messages (sender, recipient, filename, content_type, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(&message.filename)
        .bind(&message.content_type)
        .bind(message.content.as_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(id.to_string())
    }

    async fn list_for_recipient(&self, recipient: &str) -> Result<Vec<MessageSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT id, sender, filename, created_at
            FROM messages
            WHERE recipient = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(recipient)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_audio(&self, id: &str) -> Result<Option<AudioFile>> {
        // Identifiers that are not UUIDs cannot match any row.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, AudioRow>(
            r"
            SELECT filename, content_type, content
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

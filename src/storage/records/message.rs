use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct SummaryRow {
    pub id: Uuid,
    pub sender: String,
    pub filename: String,
    pub created_at: OffsetDateTime,
}

impl From<SummaryRow> for crate::domain::message::MessageSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id.to_string(),
            sender: row.sender,
            filename: row.filename,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AudioRow {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl From<AudioRow> for crate::domain::message::AudioFile {
    fn from(row: AudioRow) -> Self {
        Self {
            filename: row.filename,
            content_type: row.content_type,
            content: row.content.into(),
        }
    }
}

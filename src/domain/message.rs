use bytes::Bytes;
use time::OffsetDateTime;

/// A fully validated message ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: String,
    pub recipient: String,
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Metadata of a stored message, without the audio payload.
#[derive(Clone, Debug)]
pub struct MessageSummary {
    pub id: String,
    pub sender: String,
    pub filename: String,
    pub created_at: OffsetDateTime,
}

/// The audio payload of a stored message.
#[derive(Clone, Debug)]
pub struct AudioFile {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

/// A file part extracted from a multipart upload, before validation.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: Bytes,
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
}

/// One element of the listing response. `url` is derived from the record id
/// at response time, never stored.
#[derive(Debug, Serialize)]
pub struct MessageSummaryResponse {
    pub id: String,
    pub sender: String,
    pub filename: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesParams {
    pub recipient: Option<String>,
}

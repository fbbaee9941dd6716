use crate::domain::message::{AudioFile, MessageSummary, NewMessage};
use crate::error::{AppError, Result};
use crate::storage::MessageStore;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug)]
struct StoredMessage {
    id: String,
    sender: String,
    recipient: String,
    filename: String,
    content_type: String,
    content: Vec<u8>,
    created_at: OffsetDateTime,
}

/// In-memory [`MessageStore`] used by the integration tests and for local
/// development without a database.
#[derive(Debug)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<StoredMessage>>,
    healthy: AtomicBool,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self { messages: Mutex::new(Vec::new()), healthy: AtomicBool::new(true) }
    }

    /// Toggles whether subsequent store operations succeed. While unhealthy,
    /// every [`MessageStore`] method returns an internal error, mimicking an
    /// unreachable database.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    fn check_healthy(&self) -> Result<()> {
        if self.healthy.load(Ordering::SeqCst) { Ok(()) } else { Err(AppError::Internal) }
    }

    /// Number of stored messages.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().expect("message store lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn ping(&self) -> Result<()> {
        self.check_healthy()
    }

    async fn insert(&self, message: NewMessage) -> Result<String> {
        self.check_healthy()?;
        let id = Uuid::new_v4().to_string();
        let stored = StoredMessage {
            id: id.clone(),
            sender: message.sender,
            recipient: message.recipient,
            filename: message.filename,
            content_type: message.content_type,
            content: message.content.to_vec(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.messages.lock().map_err(|_| AppError::Internal)?.push(stored);
        Ok(id)
    }

    async fn list_for_recipient(&self, recipient: &str) -> Result<Vec<MessageSummary>> {
        self.check_healthy()?;
        let mut summaries: Vec<MessageSummary> = self
            .messages
            .lock()
            .map_err(|_| AppError::Internal)?
            .iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| MessageSummary {
                id: m.id.clone(),
                sender: m.sender.clone(),
                filename: m.filename.clone(),
                created_at: m.created_at,
            })
            .collect();

        // Stable sort keeps insertion order for equal timestamps.
        summaries.sort_by_key(|m| m.created_at);
        Ok(summaries)
    }

    async fn fetch_audio(&self, id: &str) -> Result<Option<AudioFile>> {
        self.check_healthy()?;
        let audio = self.messages.lock().map_err(|_| AppError::Internal)?.iter().find(|m| m.id == id).map(|m| {
            AudioFile {
                filename: m.filename.clone(),
                content_type: m.content_type.clone(),
                content: m.content.clone().into(),
            }
        });
        Ok(audio)
    }
}

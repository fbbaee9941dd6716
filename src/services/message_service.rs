use crate::config::UploadConfig;
use crate::domain::message::{AudioFile, MessageSummary, NewMessage, UploadedFile};
use crate::error::{AppError, Result};
use crate::storage::MessageStore;
use std::sync::Arc;
use thiserror::Error;

/// Canonical MIME types for common audio filename extensions, consulted when
/// the declared content type is absent or generic. The resolved type must
/// still pass the configured allowlist.
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("mp4", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("webm", "audio/webm"),
    ("flac", "audio/flac"),
    ("aac", "audio/aac"),
];

/// Tagged validation outcome for uploads; the `Display` strings are the wire
/// `error` messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Missing required fields")]
    MissingRequiredFields,
    #[error("Unsupported audio format")]
    UnsupportedFormat,
    #[error("File too large")]
    FileTooLarge,
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

/// Raw upload fields as extracted from the multipart request, before validation.
#[derive(Clone, Debug, Default)]
pub struct UploadRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    config: UploadConfig,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, config: UploadConfig) -> Self {
        Self { store, config }
    }

    /// Validates an upload and persists it, returning the store-generated id.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if validation fails.
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, request),
        fields(message_id = tracing::field::Empty, upload_size = tracing::field::Empty)
    )]
    pub async fn upload(&self, request: UploadRequest) -> Result<String> {
        let message = self.validate(request)?;
        tracing::Span::current().record("upload_size", message.content.len());

        let id = self.store.insert(message).await?;
        tracing::Span::current().record("message_id", tracing::field::display(&id));
        tracing::debug!("Message stored");

        Ok(id)
    }

    /// Returns the messages addressed to `recipient` in chronological order.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list_for_recipient(&self, recipient: &str) -> Result<Vec<MessageSummary>> {
        self.store.list_for_recipient(recipient).await
    }

    /// Fetches the audio payload of a stored message.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if no message with the given id exists.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn fetch_audio(&self, id: &str) -> Result<AudioFile> {
        self.store.fetch_audio(id).await?.ok_or(AppError::NotFound)
    }

    /// Validation order is fixed: required fields, then format, then size.
    fn validate(&self, request: UploadRequest) -> std::result::Result<NewMessage, UploadError> {
        let sender = request.sender.filter(|s| !s.trim().is_empty());
        let recipient = request.recipient.filter(|s| !s.trim().is_empty());
        let file = request.file.filter(|f| !f.content.is_empty());

        let (Some(sender), Some(recipient), Some(file)) = (sender, recipient, file) else {
            return Err(UploadError::MissingRequiredFields);
        };
        let Some(filename) = file.filename.filter(|s| !s.is_empty()) else {
            return Err(UploadError::MissingRequiredFields);
        };

        let content_type = self.accepted_content_type(file.content_type.as_deref(), &filename)?;

        if file.content.len() > self.config.max_size_bytes {
            return Err(UploadError::FileTooLarge);
        }

        Ok(NewMessage { sender, recipient, filename, content_type, content: file.content })
    }

    /// Resolves the effective content type, falling back to the filename
    /// extension when the declared type is absent or generic. Either way the
    /// result must be in the configured allowlist.
    fn accepted_content_type(
        &self,
        declared: Option<&str>,
        filename: &str,
    ) -> std::result::Result<String, UploadError> {
        let resolved = match declared {
            Some(ct) if !ct.eq_ignore_ascii_case("application/octet-stream") => Some(ct.to_ascii_lowercase()),
            _ => filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .and_then(|ext| EXTENSION_TYPES.iter().find(|(e, _)| *e == ext))
                .map(|(_, ct)| (*ct).to_string()),
        };

        match resolved {
            Some(ct) if self.is_accepted(&ct) => Ok(ct),
            _ => Err(UploadError::UnsupportedFormat),
        }
    }

    fn is_accepted(&self, content_type: &str) -> bool {
        self.config.accepted_types.iter().any(|accepted| accepted.eq_ignore_ascii_case(content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::storage::memory::InMemoryMessageStore;
    use bytes::Bytes;

    fn service(max_size_bytes: usize) -> MessageService {
        service_with_types(max_size_bytes, &["audio/wav", "audio/mpeg"])
    }

    fn service_with_types(max_size_bytes: usize, accepted_types: &[&str]) -> MessageService {
        let config = UploadConfig {
            max_size_bytes,
            accepted_types: accepted_types.iter().map(ToString::to_string).collect(),
        };
        MessageService::new(Arc::new(InMemoryMessageStore::new()), config)
    }

    fn wav_file(len: usize) -> UploadedFile {
        UploadedFile {
            filename: Some("clip.wav".to_string()),
            content_type: Some("audio/wav".to_string()),
            content: Bytes::from(vec![0u8; len]),
        }
    }

    fn request(file: Option<UploadedFile>) -> UploadRequest {
        UploadRequest {
            sender: Some("user1".to_string()),
            recipient: Some("user2".to_string()),
            file,
        }
    }

    #[test]
    fn accepts_valid_upload() {
        let msg = service(1024).validate(request(Some(wav_file(16)))).unwrap();
        assert_eq!(msg.sender, "user1");
        assert_eq!(msg.content_type, "audio/wav");
    }

    #[test]
    fn rejects_missing_fields() {
        let svc = service(1024);
        assert_eq!(svc.validate(UploadRequest::default()), Err(UploadError::MissingRequiredFields));
        assert_eq!(svc.validate(request(None)), Err(UploadError::MissingRequiredFields));

        let mut req = request(Some(wav_file(16)));
        req.sender = Some("   ".to_string());
        assert_eq!(svc.validate(req), Err(UploadError::MissingRequiredFields));
    }

    #[test]
    fn rejects_empty_file() {
        assert_eq!(
            service(1024).validate(request(Some(wav_file(0)))),
            Err(UploadError::MissingRequiredFields)
        );
    }

    #[test]
    fn rejects_unsupported_format() {
        let mut file = wav_file(16);
        file.filename = Some("notes.txt".to_string());
        file.content_type = Some("text/plain".to_string());
        assert_eq!(service(1024).validate(request(Some(file))), Err(UploadError::UnsupportedFormat));
    }

    #[test]
    fn rejects_oversized_file() {
        assert_eq!(service(8).validate(request(Some(wav_file(9)))), Err(UploadError::FileTooLarge));
    }

    #[test]
    fn missing_fields_takes_precedence_over_size() {
        let mut req = request(Some(wav_file(64)));
        req.recipient = None;
        assert_eq!(service(8).validate(req), Err(UploadError::MissingRequiredFields));
    }

    #[test]
    fn falls_back_to_extension_for_generic_type() {
        let mut file = wav_file(16);
        file.content_type = Some("application/octet-stream".to_string());
        let msg = service(1024).validate(request(Some(file))).unwrap();
        assert_eq!(msg.content_type, "audio/wav");

        let mut file = wav_file(16);
        file.content_type = None;
        file.filename = Some("clip.bin".to_string());
        assert_eq!(service(1024).validate(request(Some(file))), Err(UploadError::UnsupportedFormat));
    }

    #[test]
    fn extension_fallback_resolves_canonical_type() {
        // .mp3 resolves to audio/mpeg, the same type a declared upload needs.
        let mut file = wav_file(16);
        file.filename = Some("voice.mp3".to_string());
        file.content_type = None;
        let msg = service(1024).validate(request(Some(file))).unwrap();
        assert_eq!(msg.content_type, "audio/mpeg");
    }

    #[test]
    fn extension_fallback_respects_configured_allowlist() {
        let svc = service_with_types(1024, &["audio/mpeg"]);

        // A narrowed allowlist rejects undeclared uploads of other formats.
        let mut file = wav_file(16);
        file.content_type = None;
        assert_eq!(svc.validate(request(Some(file))), Err(UploadError::UnsupportedFormat));

        let mut file = wav_file(16);
        file.filename = Some("voice.mp3".to_string());
        file.content_type = None;
        let msg = svc.validate(request(Some(file))).unwrap();
        assert_eq!(msg.content_type, "audio/mpeg");
    }
}

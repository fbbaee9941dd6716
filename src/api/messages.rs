use crate::api::AppState;
use crate::api::schemas::messages::{ListMessagesParams, MessageSummaryResponse, UploadResponse};
use crate::domain::message::UploadedFile;
use crate::error::{AppError, Result};
use crate::services::message_service::{UploadError, UploadRequest};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};

/// Accepts a multipart upload with `sender`, `recipient` and `file` parts and
/// persists the message, returning the new record's id.
///
/// # Errors
/// Returns `AppError::BadRequest` if required parts are missing, the declared
/// format is not an accepted audio type, or the payload exceeds the size limit.
pub async fn upload_message(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("sender") => {
                request.sender = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("recipient") => {
                request.recipient = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let filename = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                // The read is capped by the router's body limit; hitting the
                // cap mid-stream surfaces here as a read error.
                let content = field.bytes().await.map_err(multipart_error)?;
                request.file = Some(UploadedFile { filename, content_type, content });
            }
            _ => {}
        }
    }

    let id = state.message_service.upload(request).await?;

    Ok(Json(UploadResponse { id }))
}

/// Maps a multipart read failure to the right client error: the router's
/// body cap surfaces as a size rejection, anything else as a malformed
/// request.
fn multipart_error(e: MultipartError) -> AppError {
    if error_chain_contains::<http_body_util::LengthLimitError>(&e) {
        UploadError::FileTooLarge.into()
    } else {
        AppError::BadRequest(format!("Invalid multipart request: {e}"))
    }
}

fn error_chain_contains<T: std::error::Error + 'static>(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<T>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Lists the messages addressed to the given recipient, oldest first, with a
/// derived retrieval `url` per entry.
///
/// # Errors
/// Returns `AppError::BadRequest` if the `recipient` parameter is missing or empty.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<ListMessagesParams>,
) -> Result<impl IntoResponse> {
    let Some(recipient) = params.recipient.filter(|r| !r.trim().is_empty()) else {
        return Err(AppError::BadRequest("Missing recipient".to_string()));
    };

    let summaries = state.message_service.list_for_recipient(&recipient).await?;

    let body: Vec<MessageSummaryResponse> = summaries
        .into_iter()
        .map(|m| MessageSummaryResponse {
            url: format!("/audio/{}", m.id),
            id: m.id,
            sender: m.sender,
            filename: m.filename,
            created_at: m.created_at,
        })
        .collect();

    Ok(Json(body))
}

/// Serves the stored audio payload referenced by a listing `url`.
///
/// # Errors
/// Returns `AppError::NotFound` if no message with the given id exists.
pub async fn download_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let audio = state.message_service.fetch_audio(&id).await?;

    let mut headers = HeaderMap::new();
    let content_type = audio.content_type.parse().map_err(|_| AppError::Internal)?;
    headers.insert(header::CONTENT_TYPE, content_type);

    let disposition = format!("inline; filename=\"{}\"", audio.filename.replace(['"', '\\'], "_"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, audio.content))
}

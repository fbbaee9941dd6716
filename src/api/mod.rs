use crate::config::Config;
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use crate::storage::MessageStore;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod health;
pub mod messages;
pub mod middleware;
pub mod schemas;

/// Headroom on top of the upload ceiling for multipart framing and the text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub message_service: MessageService,
    pub health_service: HealthService,
}

/// Configures and returns the application router.
pub fn app_router(config: Config, store: Arc<dyn MessageStore>) -> Router {
    let body_cap = config.upload.max_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let state = AppState {
        message_service: MessageService::new(Arc::clone(&store), config.upload.clone()),
        health_service: HealthService::new(store, config.health.clone()),
        config,
    };

    Router::new()
        .route("/health", get(health::health))
        .route("/upload", post(messages::upload_message))
        .route("/messages", get(messages::list_messages))
        .route("/audio/{id}", get(messages::download_audio))
        .layer(DefaultBodyLimit::max(body_cap))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

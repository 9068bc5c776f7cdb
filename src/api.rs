//! HTTP surface for the transcript gateway.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `GET /` – Liveness banner.
//! - `GET /fetch_transcripts?folder_id=<id>` – List every Google Doc directly inside the
//!   folder and return one `{document_id, document_name, content}` object per document.
//!   A missing or blank `folder_id` yields `400 {"error": ...}`; any upstream failure
//!   yields `500 {"error": ...}`.
//! - `GET /transcript/:document_id` – Return the transcript of a single document, or
//!   `404 {"error": ...}` when the document is missing or unreadable.
//! - `GET /metrics` – Observe fetch counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by agent hosts.
//!
//! Failures never leak internal detail beyond the error display string.

use crate::metrics::MetricsSnapshot;
use crate::transcripts::{Transcript, TranscriptApi, TranscriptError};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the transcript API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: TranscriptApi + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/fetch_transcripts", get(fetch_transcripts::<S>))
        .route("/transcript/:document_id", get(fetch_transcript::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Liveness banner for load balancers and manual checks.
async fn index() -> &'static str {
    "Transcript API is running."
}

/// Query parameters for the `GET /fetch_transcripts` endpoint.
///
/// `folder_id` is optional at the extraction layer so that a missing parameter maps onto
/// the documented 400 response instead of Axum's default rejection.
#[derive(Deserialize)]
struct FetchTranscriptsParams {
    #[serde(default)]
    folder_id: Option<String>,
}

/// Fetch a transcript for every Google Doc directly inside a folder.
async fn fetch_transcripts<S>(
    State(service): State<Arc<S>>,
    Query(params): Query<FetchTranscriptsParams>,
) -> Result<Json<Vec<Transcript>>, ApiError>
where
    S: TranscriptApi,
{
    let folder_id = match params.folder_id.as_deref().map(str::trim) {
        Some(folder_id) if !folder_id.is_empty() => folder_id.to_string(),
        _ => return Err(ApiError::bad_request("folder_id is required")),
    };

    let transcripts = service.fetch_transcripts(&folder_id).await?;
    tracing::info!(
        folder_id,
        documents = transcripts.len(),
        "Fetch request completed"
    );
    Ok(Json(transcripts))
}

/// Fetch the transcript of a single document.
async fn fetch_transcript<S>(
    State(service): State<Arc<S>>,
    Path(document_id): Path<String>,
) -> Result<Json<Transcript>, ApiError>
where
    S: TranscriptApi,
{
    let transcript = service.fetch_transcript(&document_id).await?;
    Ok(Json(transcript))
}

/// Return a concise metrics snapshot with folder and document counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: TranscriptApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in agent hosts.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "fetch_transcripts",
                method: "GET",
                path: "/fetch_transcripts",
                description: "Return a JSON array with one { \"document_id\", \"document_name\", \"content\" } object per Google Doc in the folder.",
                request_example: Some(json!({ "folder_id": "16ZJiuP2PFNn8qeZ9wgscBP9PGh0j2xfo" })),
            },
            CommandDescriptor {
                name: "fetch_transcript",
                method: "GET",
                path: "/transcript/{document_id}",
                description: "Return the transcript of a single document by its Drive identifier.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return fetch counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Failure envelope returned on every error path.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(TranscriptError),
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_string())
    }
}

impl From<TranscriptError> for ApiError {
    fn from(inner: TranscriptError) -> Self {
        match inner {
            TranscriptError::DocumentNotFound { .. } => {
                Self::NotFound("Transcript not found".to_string())
            }
            other => Self::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Upstream(inner) => {
                tracing::error!(error = %inner, "Upstream request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, inner.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

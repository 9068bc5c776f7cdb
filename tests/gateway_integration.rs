//! End-to-end tests wiring the real service against mocked Google endpoints.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use httpmock::{Method::GET, Method::POST, Mock, MockServer};
use regex::Regex;
use serde_json::json;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use transcriptd::{api, config, transcripts::TranscriptService};

static INIT: OnceCell<()> = OnceCell::const_new();
static MOCK_HANDLES: OnceCell<Vec<Mock<'static>>> = OnceCell::const_new();

const TEST_KEY_PEM: &str = include_str!("fixtures/test_key.pem");

fn set_env(key: &str, value: &str) {
    // SAFETY: Tests run in a single process and establish deterministic configuration upfront.
    unsafe { std::env::set_var(key, value) }
}

fn folder_query(folder_id: &str) -> String {
    format!("'{folder_id}' in parents and mimeType = 'application/vnd.google-apps.document'")
}

async fn init() {
    INIT.get_or_init(|| async {
        let mock_server: &'static MockServer = Box::leak(Box::new(MockServer::start_async().await));
        let base_url = mock_server.base_url();

        let credentials = json!({
            "type": "service_account",
            "client_email": "reader@project.iam.gserviceaccount.com",
            "private_key": TEST_KEY_PEM,
            "token_uri": format!("{base_url}/token"),
        })
        .to_string();

        set_env("SERVICE_ACCOUNT_JSON", &credentials);
        set_env("DRIVE_API_URL", &format!("{base_url}/drive/v3"));
        set_env("DOCS_API_URL", &format!("{base_url}/docs/v1"));
        config::init_config();

        let file_metadata_path = Regex::new(r"^/drive/v3/files/[^/]+$").unwrap();
        let mocks: Vec<Mock<'static>> = vec![
            mock_server
                .mock_async(|when, then| {
                    when.method(POST).path("/token");
                    then.status(200).json_body(json!({
                        "access_token": "integration-token",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
                })
                .await,
            // F1: readable but empty folder
            mock_server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/drive/v3/files")
                        .query_param("q", folder_query("F1"));
                    then.status(200).json_body(json!({ "files": [] }));
                })
                .await,
            // F2: one document
            mock_server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/drive/v3/files")
                        .query_param("q", folder_query("F2"));
                    then.status(200).json_body(json!({
                        "files": [{ "id": "D1", "name": "Interview" }]
                    }));
                })
                .await,
            // F3: folder the service account cannot access
            mock_server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/drive/v3/files")
                        .query_param("q", folder_query("F3"));
                    then.status(403).json_body(json!({
                        "error": { "code": 403, "message": "The caller does not have permission" }
                    }));
                })
                .await,
            mock_server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/docs/v1/documents/D1")
                        .header("authorization", "Bearer integration-token");
                    then.status(200).json_body(json!({
                        "documentId": "D1",
                        "title": "Interview",
                        "body": { "content": [
                            { "paragraph": { "elements": [
                                { "textRun": { "content": "Hello world\n" } }
                            ] } }
                        ] }
                    }));
                })
                .await,
            mock_server
                .mock_async(move |when, then| {
                    when.method(GET).path_matches(file_metadata_path.clone());
                    then.status(200).json_body(json!({ "name": "Interview" }));
                })
                .await,
        ];
        MOCK_HANDLES.set(mocks).ok();
    })
    .await;
}

async fn test_app() -> Router {
    init().await;
    let service = TranscriptService::new().await.expect("transcript service");
    api::create_router(Arc::new(service))
}

async fn get_response(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}

#[tokio::test]
async fn empty_folder_returns_empty_array() {
    let app = test_app().await;
    let (status, body) = get_response(app, "/fetch_transcripts?folder_id=F1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn folder_with_one_document_returns_its_transcript() {
    let app = test_app().await;
    let (status, body) = get_response(app, "/fetch_transcripts?folder_id=F2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "document_id": "D1",
            "document_name": "Interview",
            "content": "Hello world"
        }])
    );
}

#[tokio::test]
async fn missing_folder_id_returns_bad_request() {
    let app = test_app().await;
    let (status, body) = get_response(app, "/fetch_transcripts").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "folder_id is required" }));
}

#[tokio::test]
async fn forbidden_folder_returns_internal_error() {
    let app = test_app().await;
    let (status, body) = get_response(app, "/fetch_transcripts?folder_id=F3").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().expect("error string");
    assert!(!message.is_empty());
}

#[tokio::test]
async fn repeated_requests_return_the_same_document_ids() {
    let (_, first) = get_response(test_app().await, "/fetch_transcripts?folder_id=F2").await;
    let (_, second) = get_response(test_app().await, "/fetch_transcripts?folder_id=F2").await;

    let ids = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .expect("array body")
            .iter()
            .map(|item| item["document_id"].as_str().expect("id").to_string())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn single_transcript_is_served_by_document_id() {
    let app = test_app().await;
    let (status, body) = get_response(app, "/transcript/D1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_id"], "D1");
    assert_eq!(body["document_name"], "Interview");
    assert_eq!(body["content"], "Hello world");
}

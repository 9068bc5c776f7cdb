//! HTTP client wrapper for the Google Drive and Docs REST APIs.

use crate::auth::ServiceAccountAuth;
use crate::config::get_config;
use crate::drive::text::{self, Document};
use crate::drive::types::{DriveError, DriveFile, FileListResponse, FileMetadataResponse};
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::Duration;

/// Drive list queries select Google Docs only; other folder children are ignored.
const DOC_MIME_TYPE: &str = "application/vnd.google-apps.document";

/// Page size requested from `files.list`.
const LIST_PAGE_SIZE: &str = "100";

/// Lightweight HTTP client for Drive folder listings and Docs content retrieval.
pub struct DriveService {
    pub(crate) client: Client,
    pub(crate) drive_url: String,
    pub(crate) docs_url: String,
    pub(crate) auth: Arc<ServiceAccountAuth>,
}

impl DriveService {
    /// Construct a new client using configuration derived from the environment.
    pub fn new(auth: Arc<ServiceAccountAuth>) -> Result<Self, DriveError> {
        let config = get_config();
        let client = Client::builder()
            .user_agent("transcriptd/1.0")
            .timeout(Duration::from_secs(config.upstream_timeout_secs()))
            .build()?;

        let drive_url =
            normalize_base_url(config.drive_api_url()).map_err(DriveError::InvalidUrl)?;
        let docs_url = normalize_base_url(config.docs_api_url()).map_err(DriveError::InvalidUrl)?;
        tracing::debug!(
            drive_url = %drive_url,
            docs_url = %docs_url,
            "Initialized Google API client"
        );

        Ok(Self {
            client,
            drive_url,
            docs_url,
            auth,
        })
    }

    /// Enumerate the Google Docs stored directly inside a folder.
    ///
    /// Follows `nextPageToken` until the listing is exhausted, preserving Drive's
    /// listing order across pages.
    pub async fn list_documents(&self, folder_id: &str) -> Result<Vec<DriveFile>, DriveError> {
        let query = format!("'{folder_id}' in parents and mimeType = '{DOC_MIME_TYPE}'");
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, format_endpoint(&self.drive_url, "files"))
                .await?
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "files(id,name),nextPageToken"),
                    ("pageSize", LIST_PAGE_SIZE),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let error = DriveError::UnexpectedStatus { status, body };
                tracing::error!(folder_id, error = %error, "Failed to list folder");
                return Err(error);
            }

            let payload: FileListResponse = response.json().await?;
            files.extend(payload.files);

            match payload.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(folder_id, documents = files.len(), "Folder listed");
        Ok(files)
    }

    /// Resolve the display name of a single Drive file.
    pub async fn file_name(&self, document_id: &str) -> Result<String, DriveError> {
        let response = self
            .request(
                Method::GET,
                format_endpoint(&self.drive_url, &format!("files/{document_id}")),
            )
            .await?
            .query(&[("fields", "name")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = DriveError::UnexpectedStatus { status, body };
            tracing::error!(document_id, error = %error, "Failed to resolve file name");
            return Err(error);
        }

        let payload: FileMetadataResponse = response.json().await?;
        Ok(payload.name)
    }

    /// Fetch a document and extract its plain text.
    pub async fn document_text(&self, document_id: &str) -> Result<String, DriveError> {
        let response = self
            .request(
                Method::GET,
                format_endpoint(&self.docs_url, &format!("documents/{document_id}")),
            )
            .await?
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = DriveError::UnexpectedStatus { status, body };
            tracing::error!(document_id, error = %error, "Failed to fetch document");
            return Err(error);
        }

        let document: Document = response.json().await?;
        Ok(text::extract_text(&document))
    }

    async fn request(
        &self,
        method: Method,
        url: String,
    ) -> Result<reqwest::RequestBuilder, DriveError> {
        let token = self.auth.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

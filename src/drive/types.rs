//! Shared types used by the Drive client.

use crate::auth::AuthError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned while talking to the Google Drive and Docs APIs.
#[derive(Debug, Error)]
pub enum DriveError {
    /// API base URL failed to parse or normalize.
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Bearer token could not be acquired for the request.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
    /// Google responded with an unexpected status code.
    #[error("Unexpected Google API response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Google.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

impl DriveError {
    /// True when the upstream reported that the target does not exist.
    ///
    /// Google also answers 404 for files the service account cannot see.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// A Google Doc as listed inside a Drive folder.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    /// Opaque Drive identifier.
    pub id: String,
    /// Display name, not guaranteed unique within the folder.
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileListResponse {
    #[serde(default)]
    pub(crate) files: Vec<DriveFile>,
    #[serde(default)]
    pub(crate) next_page_token: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct FileMetadataResponse {
    pub(crate) name: String,
}

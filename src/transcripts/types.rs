//! Core data types and error definitions for transcript assembly.

use crate::auth::AuthError;
use crate::drive::DriveError;
use serde::Serialize;
use thiserror::Error;

/// A document's extracted text, as returned to API consumers.
///
/// Constructed per request and serialized with exactly these field names; the
/// `content` field is always present, even when the document body is empty.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Opaque Drive identifier of the source document.
    pub document_id: String,
    /// Display name of the source document; not guaranteed unique.
    pub document_name: String,
    /// Full plain text extracted from the document body.
    pub content: String,
}

/// Errors emitted while assembling transcripts.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Service-account credentials could not be loaded or exchanged.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
    /// A Drive or Docs API call failed.
    #[error("Google API request failed: {0}")]
    Drive(#[from] DriveError),
    /// The requested document does not exist or is not readable by the service account.
    #[error("Document not found: {document_id}")]
    DocumentNotFound {
        /// Identifier that failed to resolve.
        document_id: String,
    },
}

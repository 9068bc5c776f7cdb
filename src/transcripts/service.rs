//! Transcript service coordinating folder listings and per-document content reads.

use crate::{
    auth::ServiceAccountAuth,
    config::get_config,
    drive::{DriveFile, DriveService},
    metrics::{FetchMetrics, MetricsSnapshot},
    transcripts::types::{Transcript, TranscriptError},
};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

/// Coordinates the fetch pipeline: folder listing, content retrieval, and assembly.
///
/// The service owns long-lived handles to the authenticated Google client and the metrics
/// registry. Construct it once near process start and share it through an `Arc`; no state
/// is retained between requests beyond the counters.
pub struct TranscriptService {
    drive: DriveService,
    metrics: Arc<FetchMetrics>,
}

/// Abstraction over the fetch pipeline used by the HTTP surface.
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    /// Assemble a transcript for every Google Doc directly inside the folder.
    async fn fetch_transcripts(
        &self,
        folder_id: &str,
    ) -> Result<Vec<Transcript>, TranscriptError>;

    /// Assemble the transcript of a single document.
    async fn fetch_transcript(&self, document_id: &str) -> Result<Transcript, TranscriptError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl TranscriptService {
    /// Build a new transcript service, resolving credentials from configuration.
    pub async fn new() -> Result<Self, TranscriptError> {
        let auth = ServiceAccountAuth::from_config().await?;
        let drive = DriveService::new(Arc::new(auth))?;
        Ok(Self {
            drive,
            metrics: Arc::new(FetchMetrics::new()),
        })
    }

    /// List a folder and read every document's text.
    ///
    /// Document reads run concurrently up to the configured fan-out; results keep Drive's
    /// listing order. Any unreadable document fails the whole request, since the response
    /// shape carries no per-item status.
    pub async fn fetch_transcripts(
        &self,
        folder_id: &str,
    ) -> Result<Vec<Transcript>, TranscriptError> {
        tracing::info!(folder_id, "Fetching folder transcripts");
        let files = self.drive.list_documents(folder_id).await?;

        let transcripts: Vec<Transcript> = stream::iter(files)
            .map(|file| self.read_transcript(file))
            .buffered(get_config().fetch_concurrency())
            .try_collect()
            .await?;

        self.metrics.record_folder(transcripts.len() as u64);
        tracing::info!(
            folder_id,
            documents = transcripts.len(),
            "Folder transcripts assembled"
        );
        Ok(transcripts)
    }

    /// Read one document, resolving its display name through Drive.
    pub async fn fetch_transcript(
        &self,
        document_id: &str,
    ) -> Result<Transcript, TranscriptError> {
        tracing::info!(document_id, "Fetching single transcript");
        let document_name = self
            .drive
            .file_name(document_id)
            .await
            .map_err(|err| Self::map_not_found(err, document_id))?;
        let content = self
            .drive
            .document_text(document_id)
            .await
            .map_err(|err| Self::map_not_found(err, document_id))?;

        self.metrics.record_document();
        Ok(Transcript {
            document_id: document_id.to_string(),
            document_name,
            content,
        })
    }

    /// Return the current fetch metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn read_transcript(&self, file: DriveFile) -> Result<Transcript, TranscriptError> {
        let content = self.drive.document_text(&file.id).await?;
        Ok(Transcript {
            document_id: file.id,
            document_name: file.name,
            content,
        })
    }

    fn map_not_found(error: crate::drive::DriveError, document_id: &str) -> TranscriptError {
        if error.is_not_found() {
            TranscriptError::DocumentNotFound {
                document_id: document_id.to_string(),
            }
        } else {
            error.into()
        }
    }
}

#[async_trait]
impl TranscriptApi for TranscriptService {
    async fn fetch_transcripts(
        &self,
        folder_id: &str,
    ) -> Result<Vec<Transcript>, TranscriptError> {
        TranscriptService::fetch_transcripts(self, folder_id).await
    }

    async fn fetch_transcript(&self, document_id: &str) -> Result<Transcript, TranscriptError> {
        TranscriptService::fetch_transcript(self, document_id).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        TranscriptService::metrics_snapshot(self)
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing fetch activity.
#[derive(Default)]
pub struct FetchMetrics {
    folders_fetched: AtomicU64,
    documents_fetched: AtomicU64,
}

impl FetchMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a served folder fetch and the number of documents it returned.
    pub fn record_folder(&self, document_count: u64) {
        self.folders_fetched.fetch_add(1, Ordering::Relaxed);
        self.documents_fetched
            .fetch_add(document_count, Ordering::Relaxed);
    }

    /// Record a single-document fetch.
    pub fn record_document(&self) {
        self.documents_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            folders_fetched: self.folders_fetched.load(Ordering::Relaxed),
            documents_fetched: self.documents_fetched.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of fetch counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of folder fetches served since startup.
    pub folders_fetched: u64,
    /// Total documents read across all requests.
    pub documents_fetched: u64,
}

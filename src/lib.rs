#![deny(missing_docs)]

//! Core library for the transcriptd gateway.

/// HTTP routing and REST handlers.
pub mod api;
/// Google service-account authentication.
pub mod auth;
/// Environment-driven configuration management.
pub mod config;
/// Google Drive and Docs API integration.
pub mod drive;
/// Structured logging and tracing setup.
pub mod logging;
/// Fetch counters for diagnostics.
pub mod metrics;
/// Transcript assembly pipeline.
pub mod transcripts;

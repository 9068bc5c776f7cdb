//! Google Drive and Docs API integration.

pub mod client;
pub mod text;
pub mod types;

pub use client::DriveService;
pub use types::{DriveError, DriveFile};

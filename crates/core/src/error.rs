//! Error types for blockmap operations.
//!
//! This module defines the main error type [`BlockmapError`] which represents
//! everything that can go wrong while fetching pages, validating a run
//! configuration, or rendering a report.
//!
//! Page-level failures (a fetch that times out, a blocked upstream) are never
//! fatal for a run: the analyzer records them as a note next to an empty block
//! sequence. Only report rendering and writing surface as run failures.
//!
//! # Example
//!
//! ```rust
//! use blockmap_core::{BlockmapError, Result};
//!
//! fn require_scheme(url: &str) -> Result<()> {
//!     if !url.starts_with("http") {
//!         return Err(BlockmapError::InvalidUrl(url.to_string()));
//!     }
//!     Ok(())
//! }
//! # assert!(require_scheme("ftp://example.com").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blockmap operations.
#[derive(Error, Debug)]
pub enum BlockmapError {
    /// HTTP transport errors from reqwest.
    ///
    /// Wraps DNS failures, refused connections and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when fetching a page exceeds the per-page timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The rendering service rejected the API key.
    #[error("Rendering service rejected the API key")]
    Unauthorized,

    /// The target site refused to be scraped through the rendering service.
    #[error("Site blocked scraping (status {status})")]
    UpstreamBlocked { status: u16 },

    /// The rendering service failed internally.
    #[error("Rendering service internal error (status {status})")]
    UpstreamServerError { status: u16 },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),

    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A report could not be encoded.
    #[error("Failed to render report: {0}")]
    RenderError(String),

    /// Malformed JSON-LD payload.
    ///
    /// Extraction swallows this one; it only escapes from
    /// [`parse_ld_json`](crate::schema::parse_ld_json).
    #[error("Malformed structured data: {0}")]
    SchemaError(#[from] serde_json::Error),
}

/// Result type alias for BlockmapError.
pub type Result<T> = std::result::Result<T, BlockmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockmapError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_timeout_error() {
        let err = BlockmapError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_upstream_status_errors() {
        let blocked = BlockmapError::UpstreamBlocked { status: 422 };
        assert!(blocked.to_string().contains("422"));

        let other = BlockmapError::HttpStatus { status: 404, body: "not found".to_string() };
        assert_eq!(other.to_string(), "HTTP 404: not found");
    }
}

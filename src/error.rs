//! Error types for the mediascan threat-scanning engine.
//!
//! Structural problems inside a media file are never errors: detectors
//! resolve them to "not suspicious". The variants here cover the things that
//! can actually stop a pipeline step: file I/O, external collaborators,
//! configuration, and cooperative cancellation.

use thiserror::Error;

/// Main error type for scan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// File I/O errors (open, seek, read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller cancelled the scan
    #[error("Scan cancelled")]
    Cancelled,

    /// The caller-supplied deadline elapsed
    #[error("Scan timeout after {seconds}s")]
    Timeout { seconds: u64 },

    /// An external tool (metadata prober, frame extractor) failed
    #[error("{tool} failed: {message}")]
    Collaborator { tool: String, message: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// Build a collaborator failure for the named tool.
    pub fn collaborator(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// True for caller-driven interruption (explicit cancel or deadline).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout { .. })
    }
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

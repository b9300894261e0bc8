//! Error types for the gallery indexer

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error kinds that can occur while building a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Gallery root does not exist
    NotFound,
    /// Any I/O failure during traversal or stat calls
    ScanFailed,
}

impl ScanErrorKind {
    /// Status signal at the transport boundary
    pub fn status_code(&self) -> u16 {
        match self {
            ScanErrorKind::NotFound => 404,
            ScanErrorKind::ScanFailed => 500,
        }
    }

    /// User-visible message at the transport boundary
    pub fn public_message(&self) -> &'static str {
        match self {
            ScanErrorKind::NotFound => "directory not found",
            ScanErrorKind::ScanFailed => "failed to scan gallery",
        }
    }
}

/// Represents an error that aborted a manifest build
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct ScanError {
    /// The kind of error
    pub kind: ScanErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
    /// Underlying cause
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ScanError {
    /// Create a new scan error
    pub fn new(kind: ScanErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Create a not found error
    pub fn not_found(path: PathBuf) -> Self {
        Self::new(
            ScanErrorKind::NotFound,
            Some(path.clone()),
            format!("Not found: {:?}", path),
        )
    }

    /// Create a scan failure without an underlying cause
    pub fn scan_failed(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ScanErrorKind::ScanFailed, path, message)
    }

    /// Status signal at the transport boundary
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Whether the error means the resource is missing (vs. an internal failure)
    pub fn is_not_found(&self) -> bool {
        self.kind == ScanErrorKind::NotFound
    }

    /// Serializable body for the transport boundary
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.kind.public_message().to_string(),
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::scan_failed(None, err.to_string()).with_source(err)
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        Self::scan_failed(path, err.to_string()).with_source(err)
    }
}

/// Error body returned across the transport boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

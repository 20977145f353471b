//! # Error Types
//!
//! Errors for the storage backend and the download boundary.
//!
//! ## Who Sees These
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Error Flow                                     │
//! │                                                                         │
//! │  StorageBackend / ReceiptSink implementations                           │
//! │       │  return StoreResult (so implementations can report I/O)         │
//! │       ▼                                                                 │
//! │  CartStore operations                                                   │
//! │       │  swallow + warn! (fail-soft: errors never reach callers)        │
//! │       ▼                                                                 │
//! │  Callers see safe defaults: empty cart, skipped download                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from storage backends and boundary collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file backend, file sink).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be serialized for persistence.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No platform storage directory could be determined.
    #[error("no storage directory available")]
    NoStorageDir,

    /// No downloads directory could be determined.
    #[error("no downloads directory available")]
    NoDownloadDir,
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::NoDownloadDir;
        assert_eq!(err.to_string(), "no downloads directory available");

        let err: StoreError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(err.to_string().contains("disk full"));
    }
}

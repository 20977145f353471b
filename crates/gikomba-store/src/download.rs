//! # Download Boundary
//!
//! "Given text and a filename, offer it as a downloadable file." The
//! mechanism is environment-specific, so it lives behind a trait; the
//! store renders the receipt and hands it over.

use std::path::PathBuf;

use tracing::info;

use crate::error::{StoreError, StoreResult};

/// The file-save collaborator.
pub trait ReceiptSink: Send + Sync {
    /// Offers `text` to the user as a plain-text file named `filename`.
    fn deliver(&self, filename: &str, text: &str) -> StoreResult<()>;
}

/// Saves receipts as files in a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates a sink writing into `dir`. The directory is created on
    /// first delivery.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSink { dir: dir.into() }
    }

    /// Creates a sink targeting the user's Downloads directory.
    pub fn at_downloads_dir() -> StoreResult<Self> {
        let dirs = directories::UserDirs::new().ok_or(StoreError::NoDownloadDir)?;
        let dir = dirs.download_dir().ok_or(StoreError::NoDownloadDir)?;
        Ok(FileSink::new(dir))
    }
}

impl ReceiptSink for FileSink {
    fn deliver(&self, filename: &str, text: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, text)?;
        info!(?path, "receipt saved");
        Ok(())
    }
}

/// Discards receipts. The default sink when none is configured, so
/// `download_receipt` stays a safe no-op in headless setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReceiptSink for NullSink {
    fn deliver(&self, _filename: &str, _text: &str) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_writes_named_file() {
        let dir = std::env::temp_dir().join(format!("gikomba-sink-{}", uuid::Uuid::new_v4()));
        let sink = FileSink::new(&dir);

        sink.deliver("receipt.txt", "hello").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join("receipt.txt")).unwrap(),
            "hello"
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_null_sink_accepts_anything() {
        NullSink.deliver("receipt.txt", "hello").unwrap();
    }
}

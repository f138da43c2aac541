//! Storage abstraction for board persistence.
//!
//! The engine hands the backend an opaque payload (a base64 PNG data
//! URL) and a board id; backends may put it in memory, on disk or
//! behind an HTTP endpoint. A successful persist reports the backend's
//! status code so the shell can surface non-2xx outcomes.

mod memory;

pub use memory::MemoryStore;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Malformed board data: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for board storage backends. Payloads are opaque to the
/// backend; the engine writes and reads data URLs built with
/// [`to_data_url`]/[`from_data_url`].
pub trait BoardStore: Send + Sync {
    /// Persist a board's payload. Returns the backend status code
    /// (HTTP-style; in-process backends report 200).
    fn persist(&self, board_id: &str, data: &[u8]) -> StorageResult<u16>;

    /// Load a board's payload. `Ok(None)` means the board has never
    /// been saved, which is not an error.
    fn load(&self, board_id: &str) -> StorageResult<Option<Vec<u8>>>;
}

/// Wrap encoded PNG bytes in a `data:image/png;base64,` URL, the wire
/// shape browser-facing backends expect.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Extract PNG bytes from a data URL.
pub fn from_data_url(url: &str) -> StorageResult<Vec<u8>> {
    let payload = url
        .strip_prefix("data:image/png;base64,")
        .ok_or_else(|| StorageError::Malformed("missing data URL prefix".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| StorageError::Malformed(format!("base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_roundtrip() {
        let bytes = vec![0x89, 0x50, 0x4e, 0x47, 1, 2, 3];
        let url = to_data_url(&bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(from_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn test_data_url_rejects_foreign_prefix() {
        assert!(matches!(
            from_data_url("data:image/jpeg;base64,AAAA"),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_data_url_rejects_bad_base64() {
        assert!(matches!(
            from_data_url("data:image/png;base64,!!!"),
            Err(StorageError::Malformed(_))
        ));
    }
}

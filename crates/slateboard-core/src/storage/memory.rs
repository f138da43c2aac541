//! In-memory storage implementation.

use super::{BoardStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    boards: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored boards.
    pub fn len(&self) -> usize {
        self.boards.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BoardStore for MemoryStore {
    fn persist(&self, board_id: &str, data: &[u8]) -> StorageResult<u16> {
        let mut boards = self
            .boards
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        boards.insert(board_id.to_string(), data.to_vec());
        Ok(200)
    }

    fn load(&self, board_id: &str) -> StorageResult<Option<Vec<u8>>> {
        let boards = self
            .boards
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(boards.get(board_id).cloned())
    }
}

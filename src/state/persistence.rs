//! Sled-backed node state store.
//!
//! Keys are composite, null-separated, ordered so that every purge scope is
//! one prefix scan: `bookshelf \0 style \0 level \0 node_key`. Values are
//! bincode-encoded [`NodeState`] records.

use super::{NodeState, NodeStateStore, StateScope};
use crate::error::StorageError;
use crate::types::BookshelfId;
use std::path::Path;
use tracing::debug;

const KEY_SEP: u8 = 0;

/// Durable node state store on a sled tree.
pub struct SledNodeStateStore {
    db: sled::Db,
}

impl SledNodeStateStore {
    /// Open (or create) the store at the given directory.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        debug!(path = %path.display(), "opened node state store");
        Ok(Self { db })
    }

    fn full_key(scope: &StateScope, node_key: &str, level: usize) -> Vec<u8> {
        let mut key = Self::style_prefix(scope);
        key.extend_from_slice(format!("{:04}", level).as_bytes());
        key.push(KEY_SEP);
        key.extend_from_slice(node_key.as_bytes());
        key
    }

    fn style_prefix(scope: &StateScope) -> Vec<u8> {
        let mut key = Self::bookshelf_prefix(scope.bookshelf_id);
        key.extend_from_slice(scope.style_id.as_bytes());
        key.push(KEY_SEP);
        key
    }

    fn bookshelf_prefix(bookshelf_id: BookshelfId) -> Vec<u8> {
        let mut key = Vec::new();
        key.extend_from_slice(bookshelf_id.to_string().as_bytes());
        key.push(KEY_SEP);
        key
    }

    fn purge_prefix(&self, prefix: &[u8]) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();
        let mut dropped = 0usize;
        for entry in self.db.scan_prefix(prefix) {
            let (key, _) = entry?;
            batch.remove(key);
            dropped += 1;
        }
        self.db.apply_batch(batch)?;
        debug!(dropped, "purged node states");
        Ok(())
    }
}

impl NodeStateStore for SledNodeStateStore {
    fn get(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
    ) -> Result<Option<bool>, StorageError> {
        let key = Self::full_key(scope, node_key, level);
        match self.db.get(key)? {
            Some(raw) => {
                let state: NodeState = bincode::deserialize(&raw)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                Ok(Some(state.expanded))
            }
            None => Ok(None),
        }
    }

    fn put(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
        expanded: bool,
    ) -> Result<(), StorageError> {
        let state = NodeState {
            bookshelf_id: scope.bookshelf_id,
            style_id: scope.style_id.clone(),
            node_key: node_key.to_string(),
            level,
            expanded,
        };
        let raw = bincode::serialize(&state).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.db
            .insert(Self::full_key(scope, node_key, level), raw)?;
        Ok(())
    }

    fn purge_style(&self, scope: &StateScope) -> Result<(), StorageError> {
        self.purge_prefix(&Self::style_prefix(scope))
    }

    fn purge_bookshelf(&self, bookshelf_id: BookshelfId) -> Result<(), StorageError> {
        self.purge_prefix(&Self::bookshelf_prefix(bookshelf_id))
    }

    fn purge_all(&self) -> Result<(), StorageError> {
        self.db.clear()?;
        Ok(())
    }
}

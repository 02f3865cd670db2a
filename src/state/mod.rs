//! Node state persistence
//!
//! Expand/collapse flags survive rebuilds: they are keyed by (bookshelf,
//! style, node key, level), and node keys are stable across rebuilds of the
//! same style, so state reattaches to the freshly materialized rows.

pub mod persistence;

use crate::error::StorageError;
use crate::types::BookshelfId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use persistence::SledNodeStateStore;

/// Identifies the (bookshelf, style) scope owning a set of node states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateScope {
    pub bookshelf_id: BookshelfId,
    pub style_id: String,
}

impl StateScope {
    pub fn new(bookshelf_id: BookshelfId, style_id: impl Into<String>) -> Self {
        Self {
            bookshelf_id,
            style_id: style_id.into(),
        }
    }
}

/// Persisted expand/collapse flag for one node position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub bookshelf_id: BookshelfId,
    pub style_id: String,
    pub node_key: String,
    pub level: usize,
    pub expanded: bool,
}

/// Node state store interface.
///
/// Implementations must be safe to share across builds; builds for distinct
/// (bookshelf, style) scopes touch disjoint key ranges.
pub trait NodeStateStore: Send + Sync {
    /// Stored flag for a node position, if any.
    fn get(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
    ) -> Result<Option<bool>, StorageError>;

    /// Insert or replace the flag for a node position.
    fn put(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
        expanded: bool,
    ) -> Result<(), StorageError>;

    /// Drop every state in one (bookshelf, style) scope.
    fn purge_style(&self, scope: &StateScope) -> Result<(), StorageError>;

    /// Drop every state for a deleted bookshelf, all styles.
    fn purge_bookshelf(&self, bookshelf_id: BookshelfId) -> Result<(), StorageError>;

    /// Drop everything.
    fn purge_all(&self) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryNodeStateStore {
    states: RwLock<HashMap<(BookshelfId, String, usize, String), bool>>,
}

impl MemoryNodeStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeStateStore for MemoryNodeStateStore {
    fn get(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
    ) -> Result<Option<bool>, StorageError> {
        let map = self.states.read();
        Ok(map
            .get(&(
                scope.bookshelf_id,
                scope.style_id.clone(),
                level,
                node_key.to_string(),
            ))
            .copied())
    }

    fn put(
        &self,
        scope: &StateScope,
        node_key: &str,
        level: usize,
        expanded: bool,
    ) -> Result<(), StorageError> {
        let mut map = self.states.write();
        map.insert(
            (
                scope.bookshelf_id,
                scope.style_id.clone(),
                level,
                node_key.to_string(),
            ),
            expanded,
        );
        Ok(())
    }

    fn purge_style(&self, scope: &StateScope) -> Result<(), StorageError> {
        let mut map = self.states.write();
        map.retain(|(shelf, style, _, _), _| {
            *shelf != scope.bookshelf_id || *style != scope.style_id
        });
        Ok(())
    }

    fn purge_bookshelf(&self, bookshelf_id: BookshelfId) -> Result<(), StorageError> {
        let mut map = self.states.write();
        map.retain(|(shelf, _, _, _), _| *shelf != bookshelf_id);
        Ok(())
    }

    fn purge_all(&self) -> Result<(), StorageError> {
        self.states.write().clear();
        Ok(())
    }
}

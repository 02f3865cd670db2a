//! Error types for list building, lookup, and node-state persistence.

use crate::types::RowId;
use thiserror::Error;

/// Errors raised by the node-state persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying sled store failure
    #[error("state store: {0}")]
    Store(#[from] sled::Error),

    /// State record could not be encoded or decoded
    #[error("state record encoding: {0}")]
    Encoding(String),

    /// Filesystem-level failure opening or purging the store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the list builder and facade.
#[derive(Debug, Error)]
pub enum ListError {
    /// A build aborted mid-way; the partially written storage has been
    /// discarded and must not be queried. Retryable.
    #[error("list build failed: {0}")]
    BuildFailed(#[source] StorageError),

    /// Row id not present in the current materialized storage, typically a
    /// stale reference held across a rebuild.
    #[error("unknown node id {0}")]
    UnknownNodeId(RowId),

    /// A persisted style referenced a group id the catalog does not know.
    /// Fatal for that style; callers substitute a default style.
    #[error("invalid group id {0}")]
    InvalidGroupId(u16),

    /// A persisted style could not be decoded at all.
    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ListError {
    /// Whether retrying the failed operation may succeed without the caller
    /// changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ListError::BuildFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, ListError>;

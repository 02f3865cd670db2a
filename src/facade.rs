//! List facade
//!
//! The public surface over one build's materialized storage: counts, a
//! windowed cursor over visible rows, book-to-node lookups, node toggling,
//! and targeted field patches. All operations run under one read/write lock:
//! readers share, writers serialize. Dropping the facade drops the
//! materialized storage; row ids become stale at that point.

use crate::error::{ListError, Result};
use crate::schema::columns;
use crate::state::{NodeStateStore, StateScope};
use crate::store::{ListRow, ListStore};
use crate::types::{BookId, RowId};
use crate::visibility::{self, ToggleOutcome};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// External collaborator answering "does this book have a persisted cover
/// image".
pub trait CoverPresence: Send + Sync {
    fn has_cover(&self, book_id: BookId) -> bool;
}

/// Facade over one (bookshelf, style) build.
pub struct ListFacade {
    store: RwLock<ListStore>,
    states: Arc<dyn NodeStateStore>,
    scope: StateScope,
}

impl ListFacade {
    pub fn new(store: ListStore, states: Arc<dyn NodeStateStore>, scope: StateScope) -> Self {
        Self {
            store: RwLock::new(store),
            states,
            scope,
        }
    }

    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    /// Count of book-level rows. A book under several parents counts once
    /// per parent.
    pub fn total_book_count(&self) -> usize {
        self.store.read().book_row_count()
    }

    /// Count of distinct books.
    pub fn distinct_book_count(&self) -> usize {
        self.store.read().distinct_book_count()
    }

    pub fn visible_row_count(&self) -> usize {
        self.store.read().visible_count()
    }

    /// Total materialized row count, visible or not.
    pub fn row_count(&self) -> usize {
        self.store.read().len()
    }

    /// One page of visible rows in navigation order.
    pub fn window(&self, offset: usize, count: usize) -> Vec<ListRow> {
        let store = self.store.read();
        store
            .nodes()
            .iter()
            .filter(|n| n.visible)
            .skip(offset)
            .take(count)
            .map(ListRow::of)
            .collect()
    }

    /// Every leaf node for a book, in navigation order. Zero, one, or many.
    pub fn nodes_for_book(&self, book_id: BookId) -> Vec<ListRow> {
        let store = self.store.read();
        store
            .rows_for_book(book_id)
            .iter()
            .filter_map(|&row| store.node(row))
            .map(ListRow::of)
            .collect()
    }

    /// The currently visible leaf nodes for a book. If none are visible,
    /// every node for the book is made visible first and all are returned.
    pub fn visible_nodes_for_book(&self, book_id: BookId) -> Result<Vec<ListRow>> {
        let mut store = self.store.write();
        let rows: Vec<RowId> = store.rows_for_book(book_id).to_vec();
        let visible: Vec<ListRow> = rows
            .iter()
            .filter_map(|&row| store.node(row))
            .filter(|n| n.visible)
            .map(ListRow::of)
            .collect();
        if !visible.is_empty() {
            return Ok(visible);
        }
        for &row in &rows {
            visibility::ensure_visible(&mut store, &*self.states, &self.scope, row)?;
        }
        Ok(rows
            .iter()
            .filter_map(|&row| store.node(row))
            .map(ListRow::of)
            .collect())
    }

    /// Flip a node open or closed. See [`visibility::toggle`] for cascade
    /// semantics.
    pub fn toggle(&self, row_id: RowId, relative_child_depth: usize) -> Result<ToggleOutcome> {
        let mut store = self.store.write();
        visibility::toggle(
            &mut store,
            &*self.states,
            &self.scope,
            row_id,
            relative_child_depth,
        )
    }

    /// Bulk expand or collapse everything below `top_level`.
    pub fn set_all_expanded(&self, top_level: usize, expand: bool) {
        let mut store = self.store.write();
        visibility::set_all(&mut store, &*self.states, &self.scope, top_level, expand);
    }

    /// Rank of a node among visible rows. Never fails; hidden or stale rows
    /// yield the total row count.
    pub fn rank(&self, row_id: RowId) -> usize {
        visibility::adapter_rank(&self.store.read(), row_id)
    }

    /// Patch one display field on every leaf node of a book, without a
    /// rebuild. Meant for cheap, frequent fields; failures are non-fatal and
    /// leave the stored value unchanged.
    pub fn patch_book_field(&self, book_id: BookId, field: &str, value: &str) {
        let mut store = self.store.write();
        let rows: Vec<RowId> = store.rows_for_book(book_id).to_vec();
        if rows.is_empty() {
            warn!(book_id, field, "book not materialized; field not patched");
            return;
        }
        for row in rows {
            if let Some(node) = store.node_mut(row) {
                if field == columns::TITLE {
                    node.label = value.to_string();
                } else {
                    node.detail.insert(field.to_string(), value.to_string());
                }
            }
        }
        debug!(book_id, field, "patched book field");
    }

    /// First book row after `after` whose cover is missing, made visible
    /// before it is returned. `None` scans from the top; `None` result means
    /// every remaining book has a cover.
    pub fn next_book_missing_cover(
        &self,
        after: Option<RowId>,
        covers: &dyn CoverPresence,
    ) -> Result<Option<ListRow>> {
        let mut store = self.store.write();
        let start = match after {
            Some(row) => store.index_of(row).ok_or(ListError::UnknownNodeId(row))? + 1,
            None => 0,
        };
        let hit = store.nav()[start..].iter().find_map(|entry| {
            entry
                .book_id
                .filter(|&book| !covers.has_cover(book))
                .map(|_| entry.row_id)
        });
        let Some(row) = hit else {
            return Ok(None);
        };
        visibility::ensure_visible(&mut store, &*self.states, &self.scope, row)?;
        Ok(store.node(row).map(ListRow::of))
    }
}

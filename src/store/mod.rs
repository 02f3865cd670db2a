//! Materialized list storage
//!
//! The node table and navigation table produced by one build, plus the
//! lookup indices over them. A `ListStore` is owned by exactly one build and
//! dropped wholesale on rebuild or session end; a half-built store is never
//! handed out.

use crate::schema::GroupId;
use crate::types::{BookId, RowId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// One materialized row of the rendered tree: a group header or a leaf book
/// entry.
#[derive(Debug, Clone)]
pub struct Node {
    /// Surrogate id, stable within one build only.
    pub row_id: RowId,
    /// 1-based depth.
    pub level: usize,
    /// Producing group, or [`GroupId::Book`] for leaves.
    pub group: GroupId,
    /// Hierarchical path key of this node's tree position.
    pub key: String,
    /// Set only on book rows. A book owning several leaf nodes keeps the same
    /// id in each.
    pub book_id: Option<BookId>,
    /// Display value for this level.
    pub label: String,
    /// Base-domain display values pushed down by outer levels (book rows).
    pub detail: BTreeMap<String, String>,
    /// Whether this node's children are shown.
    pub expanded: bool,
    /// Derived: true iff every strict ancestor is expanded.
    pub visible: bool,
}

/// Flattened traversal entry, one per node, in build order. Keeps neighbor
/// walks O(1) regardless of depth.
#[derive(Debug, Clone, Copy)]
pub struct NavEntry {
    pub row_id: RowId,
    pub book_id: Option<BookId>,
    pub level: usize,
}

/// Display projection of one row handed to consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ListRow {
    pub row_id: RowId,
    pub level: usize,
    pub group: GroupId,
    pub label: String,
    pub book_id: Option<BookId>,
    pub detail: BTreeMap<String, String>,
    pub expanded: bool,
}

impl ListRow {
    pub(crate) fn of(node: &Node) -> Self {
        Self {
            row_id: node.row_id,
            level: node.level,
            group: node.group,
            label: node.label.clone(),
            book_id: node.book_id,
            detail: node.detail.clone(),
            expanded: node.expanded,
        }
    }
}

/// Node and navigation tables for one build.
#[derive(Debug, Default)]
pub struct ListStore {
    nodes: Vec<Node>,
    nav: Vec<NavEntry>,
    by_row: HashMap<RowId, usize>,
    by_level_key: HashMap<(usize, String), RowId>,
    by_book: HashMap<BookId, Vec<RowId>>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node in emission order, indexing it. Group rows register
    /// their (level, key) identity for ancestor lookups; book rows register
    /// under their book id.
    pub(crate) fn push(&mut self, node: Node) {
        let index = self.nodes.len();
        self.by_row.insert(node.row_id, index);
        match node.book_id {
            Some(book_id) => {
                self.by_book.entry(book_id).or_default().push(node.row_id);
            }
            None => {
                self.by_level_key
                    .insert((node.level, node.key.clone()), node.row_id);
            }
        }
        self.nav.push(NavEntry {
            row_id: node.row_id,
            book_id: node.book_id,
            level: node.level,
        });
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }

    /// Table position of a row id from the current build.
    pub fn index_of(&self, row_id: RowId) -> Option<usize> {
        self.by_row.get(&row_id).copied()
    }

    pub fn node(&self, row_id: RowId) -> Option<&Node> {
        self.index_of(row_id).map(|i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, row_id: RowId) -> Option<&mut Node> {
        let index = self.index_of(row_id)?;
        Some(&mut self.nodes[index])
    }

    /// Group row occupying a (level, key) tree position, if materialized.
    pub fn row_at(&self, level: usize, key: &str) -> Option<RowId> {
        self.by_level_key.get(&(level, key.to_string())).copied()
    }

    /// All leaf rows for a book, in build order. Zero, one, or many.
    pub fn rows_for_book(&self, book_id: BookId) -> &[RowId] {
        self.by_book
            .get(&book_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Contiguous index range of the strict descendants of the node at
    /// `index`. Emission order is depth-first, so a subtree is one run.
    pub fn descendant_range(&self, index: usize) -> Range<usize> {
        let level = self.nodes[index].level;
        let mut end = index + 1;
        while end < self.nodes.len() && self.nodes[end].level > level {
            end += 1;
        }
        index + 1..end
    }

    /// Count of book-level rows, duplicates included.
    pub fn book_row_count(&self) -> usize {
        self.nav.iter().filter(|e| e.book_id.is_some()).count()
    }

    /// Count of distinct books materialized.
    pub fn distinct_book_count(&self) -> usize {
        self.by_book.len()
    }

    /// Count of currently visible rows.
    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visible).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_node(row_id: RowId, level: usize, key: &str) -> Node {
        Node {
            row_id,
            level,
            group: GroupId::Author,
            key: key.to_string(),
            book_id: None,
            label: key.to_string(),
            detail: BTreeMap::new(),
            expanded: false,
            visible: level == 1,
        }
    }

    fn book_node(row_id: RowId, level: usize, key: &str, book_id: BookId) -> Node {
        Node {
            book_id: Some(book_id),
            group: GroupId::Book,
            ..group_node(row_id, level, key)
        }
    }

    #[test]
    fn descendant_range_covers_one_subtree() {
        let mut store = ListStore::new();
        store.push(group_node(1, 1, "/a=1"));
        store.push(group_node(2, 2, "/a=1/s=1"));
        store.push(book_node(3, 3, "/a=1/s=1", 10));
        store.push(group_node(4, 1, "/a=2"));
        store.push(book_node(5, 2, "/a=2", 11));

        assert_eq!(store.descendant_range(0), 1..3);
        assert_eq!(store.descendant_range(1), 2..3);
        assert_eq!(store.descendant_range(3), 4..5);
        assert_eq!(store.descendant_range(4), 5..5);
    }

    #[test]
    fn books_index_by_id_and_groups_by_position() {
        let mut store = ListStore::new();
        store.push(group_node(1, 1, "/a=1"));
        store.push(book_node(2, 2, "/a=1", 10));
        store.push(group_node(3, 1, "/a=2"));
        store.push(book_node(4, 2, "/a=2", 10));

        assert_eq!(store.rows_for_book(10), &[2, 4]);
        assert_eq!(store.row_at(1, "/a=2"), Some(3));
        assert_eq!(store.row_at(2, "/a=1"), None);
        assert_eq!(store.book_row_count(), 2);
        assert_eq!(store.distinct_book_count(), 1);
    }
}

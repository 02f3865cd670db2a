//! List builder
//!
//! Materializes the node and navigation tables for one (bookshelf, style)
//! pair in a single pass over the pre-joined source rows. A build is
//! all-or-nothing: the store is only handed out fully populated, and any
//! mid-build failure discards the partial tables.

pub mod sort;

use crate::error::{ListError, Result};
use crate::key;
use crate::row::SourceRow;
use crate::schema::GroupId;
use crate::state::{NodeStateStore, StateScope};
use crate::store::{ListStore, Node};
use crate::style::Style;
use crate::types::RowId;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Builds the materialized listing for one (bookshelf, style) pair.
pub struct ListBuilder<'a> {
    style: &'a Style,
    states: &'a dyn NodeStateStore,
    scope: StateScope,
}

impl<'a> ListBuilder<'a> {
    pub fn new(style: &'a Style, states: &'a dyn NodeStateStore, scope: StateScope) -> Self {
        Self {
            style,
            states,
            scope,
        }
    }

    /// Run the build. The level sequence is the style's groups in order plus
    /// the implicit trailing book level; group rows are deduplicated by
    /// (level, key) first-seen, book rows never are.
    pub fn build(&self, rows: Vec<SourceRow>) -> Result<ListStore> {
        let resolved = self.style.resolve()?;
        let sort_domains = resolved.sort_domains();
        debug!(
            rows = rows.len(),
            levels = resolved.group_level_count(),
            "starting list build"
        );

        let mut keyed: Vec<(Vec<sort::SortValue>, SourceRow)> = rows
            .into_iter()
            .map(|row| (sort::sort_key(&sort_domains, &row), row))
            .collect();
        keyed.sort_by(|a, b| sort::compare_keys(&sort_domains, &a.0, &b.0));

        let base_domains = resolved.accumulated_base_domains();
        let depth = resolved.default_expansion_depth;
        let mut store = ListStore::new();
        let mut next_row: RowId = 1;

        for (_, row) in &keyed {
            let mut path = String::new();
            // True while every level emitted so far along this row's chain is
            // expanded; that is exactly the visibility of the next level.
            let mut anc_visible = true;

            for (i, resolved_level) in resolved.levels().iter().enumerate() {
                let level = i + 1;
                let def = resolved_level.def;
                let key_value = def.key_value_domain(resolved.name_order).expr.eval(row);
                path = key::append(&path, &key::encode(def.key_prefix, &key_value));

                let (node_visible, node_expanded) = match store
                    .row_at(level, &path)
                    .and_then(|id| store.node(id).map(|n| (n.visible, n.expanded)))
                {
                    Some(flags) => flags,
                    None => {
                        let expanded = self
                            .states
                            .get(&self.scope, &path, level)
                            .map_err(ListError::BuildFailed)?
                            .unwrap_or(level <= depth);
                        let node = Node {
                            row_id: next_row,
                            level,
                            group: def.id,
                            key: path.clone(),
                            book_id: None,
                            label: def.resolved_key_domain(resolved.name_order).expr.eval(row),
                            detail: BTreeMap::new(),
                            expanded,
                            visible: anc_visible,
                        };
                        next_row += 1;
                        store.push(node);
                        (anc_visible, expanded)
                    }
                };
                anc_visible = node_visible && node_expanded;
            }

            let mut detail = BTreeMap::new();
            for domain in &base_domains {
                let value = domain.expr.eval(row);
                if !value.is_empty() {
                    detail.insert(domain.name.to_string(), value);
                }
            }
            store.push(Node {
                row_id: next_row,
                level: resolved.book_level(),
                group: GroupId::Book,
                key: path,
                book_id: Some(row.book_id),
                label: row.title.clone(),
                detail,
                expanded: false,
                visible: anc_visible,
            });
            next_row += 1;
        }

        info!(
            nodes = store.len(),
            book_rows = store.book_row_count(),
            books = store.distinct_book_count(),
            visible = store.visible_count(),
            "materialized booklist"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::columns;
    use crate::state::MemoryNodeStateStore;

    fn author_row(book_id: i64, title: &str, family: &str, author_id: i64) -> SourceRow {
        SourceRow::new(book_id, title)
            .with(columns::AUTHOR_FAMILY, family)
            .with(columns::AUTHOR_ID, author_id.to_string())
    }

    fn build(style: &Style, rows: Vec<SourceRow>) -> ListStore {
        let states = MemoryNodeStateStore::new();
        ListBuilder::new(style, &states, StateScope::new(1, &style.id))
            .build(rows)
            .unwrap()
    }

    #[test]
    fn group_rows_deduplicate_but_book_rows_do_not() {
        let style = Style::new("s", "Authors", &[GroupId::Author]);
        let store = build(
            &style,
            vec![
                author_row(1, "Dune", "Herbert", 10),
                author_row(2, "Whipping Star", "Herbert", 10),
            ],
        );
        // one author node, two book leaves
        assert_eq!(store.len(), 3);
        assert_eq!(store.book_row_count(), 2);
        assert_eq!(store.nodes()[0].group, GroupId::Author);
    }

    #[test]
    fn same_name_different_id_never_merges() {
        let style = Style::new("s", "Authors", &[GroupId::Author]);
        let store = build(
            &style,
            vec![
                author_row(1, "A", "Smith", 10),
                author_row(2, "B", "Smith", 11),
            ],
        );
        let authors: Vec<_> = store
            .nodes()
            .iter()
            .filter(|n| n.group == GroupId::Author)
            .collect();
        assert_eq!(authors.len(), 2);
        assert_ne!(authors[0].key, authors[1].key);
        assert_eq!(authors[0].label, authors[1].label);
    }

    #[test]
    fn default_expansion_depth_controls_initial_state() {
        let mut style = Style::new("s", "Nested", &[GroupId::Author, GroupId::Series]);
        style.default_expansion_depth = 2;
        let rows = vec![author_row(1, "Dune", "Herbert", 10)
            .with(columns::SERIES_TITLE, "Dune Saga")
            .with(columns::SERIES_ID, "5")];
        let store = build(&style, rows);
        assert!(store.nodes()[0].expanded); // level 1
        assert!(store.nodes()[1].expanded); // level 2
        assert!(store.nodes()[2].visible); // book under two expanded levels
    }

    #[test]
    fn stored_state_wins_over_default_depth() {
        let style = Style::new("s", "Authors", &[GroupId::Author]);
        let states = MemoryNodeStateStore::new();
        let scope = StateScope::new(1, "s");
        let first = ListBuilder::new(&style, &states, scope.clone())
            .build(vec![author_row(1, "Dune", "Herbert", 10)])
            .unwrap();
        // default depth leaves the author collapsed
        assert!(!first.nodes()[0].expanded);
        let author_key = first.nodes()[0].key.clone();
        states.put(&scope, &author_key, 1, true).unwrap();

        let rebuilt = ListBuilder::new(&style, &states, scope)
            .build(vec![author_row(1, "Dune", "Herbert", 10)])
            .unwrap();
        assert!(rebuilt.nodes()[0].expanded);
        assert!(rebuilt.nodes()[1].visible);
    }

    #[test]
    fn emission_order_is_depth_first() {
        let style = Style::new("s", "Nested", &[GroupId::Author, GroupId::Series]);
        let rows = vec![
            author_row(1, "Dune", "Herbert", 10)
                .with(columns::SERIES_TITLE, "Dune Saga")
                .with(columns::SERIES_ID, "5"),
            author_row(2, "Foundation", "Asimov", 11)
                .with(columns::SERIES_TITLE, "Foundation")
                .with(columns::SERIES_ID, "6"),
        ];
        let store = build(&style, rows);
        let levels: Vec<_> = store.nav().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 1, 2, 3]);
        // Asimov sorts before Herbert
        assert_eq!(store.nodes()[0].label, "Asimov");
    }
}

//! Shared fixtures for integration tests.
#![allow(dead_code)]

use shelftree::build::ListBuilder;
use shelftree::facade::ListFacade;
use shelftree::row::SourceRow;
use shelftree::schema::columns;
use shelftree::state::{MemoryNodeStateStore, NodeStateStore, StateScope};
use shelftree::store::ListStore;
use shelftree::style::Style;
use std::sync::Arc;

pub const BOOKSHELF: i64 = 1;

pub fn author_row(
    book_id: i64,
    title: &str,
    family: &str,
    given: &str,
    author_id: i64,
) -> SourceRow {
    SourceRow::new(book_id, title)
        .with(columns::AUTHOR_FAMILY, family)
        .with(columns::AUTHOR_GIVEN, given)
        .with(columns::AUTHOR_ID, author_id.to_string())
}

pub fn series_row(
    book_id: i64,
    title: &str,
    series: &str,
    series_id: i64,
    position: &str,
) -> SourceRow {
    SourceRow::new(book_id, title)
        .with(columns::SERIES_TITLE, series)
        .with(columns::SERIES_ID, series_id.to_string())
        .with(columns::SERIES_POSITION, position)
}

pub fn build_store(style: &Style, rows: Vec<SourceRow>, states: &dyn NodeStateStore) -> ListStore {
    ListBuilder::new(style, states, StateScope::new(BOOKSHELF, &style.id))
        .build(rows)
        .expect("build")
}

pub fn facade_with_states(
    style: &Style,
    rows: Vec<SourceRow>,
    states: Arc<dyn NodeStateStore>,
) -> ListFacade {
    let scope = StateScope::new(BOOKSHELF, &style.id);
    let store = ListBuilder::new(style, &*states, scope.clone())
        .build(rows)
        .expect("build");
    ListFacade::new(store, states, scope)
}

pub fn build_facade(style: &Style, rows: Vec<SourceRow>) -> ListFacade {
    facade_with_states(style, rows, Arc::new(MemoryNodeStateStore::new()))
}

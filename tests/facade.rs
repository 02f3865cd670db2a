//! Facade surface: windowing, patching, cover scans, stale references.

mod common;

use common::*;
use shelftree::error::ListError;
use shelftree::facade::CoverPresence;
use shelftree::schema::{columns, GroupId};
use shelftree::style::Style;
use shelftree::types::BookId;
use std::collections::HashSet;

struct Covers(HashSet<BookId>);

impl CoverPresence for Covers {
    fn has_cover(&self, book_id: BookId) -> bool {
        self.0.contains(&book_id)
    }
}

fn author_facade() -> shelftree::facade::ListFacade {
    let style = Style::new("by-author", "Authors", &[GroupId::Author]);
    build_facade(
        &style,
        vec![
            author_row(1, "Dune", "Herbert", "Frank", 10),
            author_row(2, "Whipping Star", "Herbert", "Frank", 10),
            author_row(3, "Foundation", "Asimov", "Isaac", 11),
        ],
    )
}

#[test]
fn window_pages_over_visible_rows_only() {
    let facade = author_facade();
    // collapsed: two author headers
    assert_eq!(facade.visible_row_count(), 2);
    let page = facade.window(0, 10);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].label, "Asimov, Isaac");

    facade.set_all_expanded(1, true);
    let page = facade.window(1, 2);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].book_id, Some(3));
    assert_eq!(page[1].label, "Herbert, Frank");

    // window past the end is empty
    assert!(facade.window(50, 10).is_empty());
}

#[test]
fn toggle_outcome_carries_level_state_and_rank() {
    let facade = author_facade();
    let asimov = facade.window(0, 1)[0].row_id;
    let outcome = facade.toggle(asimov, 1).unwrap();
    assert_eq!(outcome.level, 1);
    assert!(outcome.expanded);
    assert_eq!(outcome.rank, 0);
    assert_eq!(facade.visible_row_count(), 3);

    let outcome = facade.toggle(asimov, 1).unwrap();
    assert!(!outcome.expanded);
    assert_eq!(facade.visible_row_count(), 2);
}

#[test]
fn stale_row_id_reports_unknown_node() {
    let facade = author_facade();
    let err = facade.toggle(9999, 1).unwrap_err();
    assert!(matches!(err, ListError::UnknownNodeId(9999)));
    assert!(!err.is_retryable());
    assert_eq!(facade.rank(9999), facade.row_count());
}

#[test]
fn patch_updates_every_leaf_of_the_book() {
    let style = Style::new("by-author", "Authors", &[GroupId::Author]);
    let facade = build_facade(
        &style,
        vec![
            author_row(1, "The Talisman", "King", "Stephen", 10),
            author_row(1, "The Talisman", "Straub", "Peter", 11),
        ],
    );
    facade.patch_book_field(1, columns::READ_STATUS, "read");
    let nodes = facade.nodes_for_book(1);
    assert_eq!(nodes.len(), 2);
    for node in &nodes {
        assert_eq!(node.detail.get(columns::READ_STATUS).map(String::as_str), Some("read"));
    }

    facade.patch_book_field(1, columns::TITLE, "The Talisman (rev)");
    for node in facade.nodes_for_book(1) {
        assert_eq!(node.label, "The Talisman (rev)");
    }

    // unknown book: logged, no effect, no panic
    facade.patch_book_field(777, columns::READ_STATUS, "read");
}

#[test]
fn visible_nodes_returns_visible_subset_when_one_exists() {
    let style = Style::new("by-author", "Authors", &[GroupId::Author]);
    let facade = build_facade(
        &style,
        vec![
            author_row(1, "The Talisman", "King", "Stephen", 10),
            author_row(1, "The Talisman", "Straub", "Peter", 11),
        ],
    );
    // open King only; one of the two leaves becomes visible
    let king = facade
        .window(0, 10)
        .into_iter()
        .find(|r| r.label.starts_with("King"))
        .unwrap()
        .row_id;
    facade.toggle(king, 1).unwrap();

    let visible = facade.visible_nodes_for_book(1).unwrap();
    assert_eq!(visible.len(), 1);

    // collapse everything: the fallback makes both leaves visible
    facade.set_all_expanded(1, false);
    let all = facade.visible_nodes_for_book(1).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(facade.visible_nodes_for_book(1).unwrap().len(), 2);
}

#[test]
fn cover_scan_finds_and_reveals_the_first_miss() {
    let facade = author_facade();
    let covers = Covers([1, 3].into_iter().collect());

    // book 2 is the only one without a cover
    let hit = facade.next_book_missing_cover(None, &covers).unwrap().unwrap();
    assert_eq!(hit.book_id, Some(2));
    // revealed by the scan
    assert!(facade
        .window(0, 100)
        .iter()
        .any(|r| r.book_id == Some(2)));

    // scanning past it finds nothing further
    assert!(facade
        .next_book_missing_cover(Some(hit.row_id), &covers)
        .unwrap()
        .is_none());

    // a stale start position is reported, not skipped
    assert!(matches!(
        facade.next_book_missing_cover(Some(4242), &covers),
        Err(ListError::UnknownNodeId(4242))
    ));
}

#[test]
fn counts_track_visibility_and_duplication() {
    let facade = author_facade();
    assert_eq!(facade.total_book_count(), 3);
    assert_eq!(facade.distinct_book_count(), 3);
    assert!(facade.distinct_book_count() <= facade.total_book_count());

    facade.set_all_expanded(1, true);
    assert_eq!(facade.visible_row_count(), 5);
}

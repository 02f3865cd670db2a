//! Adapter-rank live scan over a large materialized list.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shelftree::build::ListBuilder;
use shelftree::row::SourceRow;
use shelftree::schema::{columns, GroupId};
use shelftree::state::{MemoryNodeStateStore, StateScope};
use shelftree::store::ListStore;
use shelftree::style::Style;
use shelftree::visibility;

fn large_store() -> ListStore {
    let style = Style::new("bench", "Authors", &[GroupId::Author]);
    let rows: Vec<SourceRow> = (0..10_000)
        .map(|i| {
            SourceRow::new(i, format!("Book {:05}", i))
                .with(columns::AUTHOR_FAMILY, format!("Author {:03}", i % 500))
                .with(columns::AUTHOR_ID, (i % 500).to_string())
        })
        .collect();
    let states = MemoryNodeStateStore::new();
    let scope = StateScope::new(1, "bench");
    let mut store = ListBuilder::new(&style, &states, scope.clone())
        .build(rows)
        .expect("build");
    visibility::set_all(&mut store, &states, &scope, 1, true);
    store
}

fn bench_rank_scan(c: &mut Criterion) {
    let store = large_store();
    let last = store.nodes().last().map(|n| n.row_id).unwrap_or_default();

    c.bench_function("adapter_rank_last_row", |b| {
        b.iter(|| visibility::adapter_rank(black_box(&store), black_box(last)))
    });

    c.bench_function("visible_count_full_scan", |b| {
        b.iter(|| black_box(&store).visible_count())
    });
}

criterion_group!(benches, bench_rank_scan);
criterion_main!(benches);

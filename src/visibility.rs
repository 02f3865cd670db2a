//! Visibility engine
//!
//! Expand/collapse over one build's materialized rows. The governing
//! invariant: a node is visible iff every strict ancestor is expanded. A
//! node's own expanded flag controls its children's visibility, never its
//! own. Ranks are computed by live scan and never cached; any mutation
//! invalidates ranks below the change point.

use crate::error::{ListError, Result};
use crate::key;
use crate::state::{NodeStateStore, StateScope};
use crate::store::ListStore;
use crate::types::RowId;
use tracing::warn;

/// Result of a toggle, carried back to consumers for incremental refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub row_id: RowId,
    pub level: usize,
    pub expanded: bool,
    /// Rank among visible rows after the toggle.
    pub rank: usize,
}

/// Flip a node's expanded flag and persist it.
///
/// Expanding cascades at most `relative_child_depth` levels down: rows within
/// the bound become visible, intermediate levels are forced open and the
/// boundary level forced closed, so rows past the bound stay hidden and keep
/// their prior flags. Collapsing hides the entire subtree (anything less
/// would leave a grandchild visible under a collapsed ancestor).
pub fn toggle(
    store: &mut ListStore,
    states: &dyn NodeStateStore,
    scope: &StateScope,
    row_id: RowId,
    relative_child_depth: usize,
) -> Result<ToggleOutcome> {
    let index = store
        .index_of(row_id)
        .ok_or(ListError::UnknownNodeId(row_id))?;
    let (level, node_key, expanded) = {
        let node = &store.nodes()[index];
        (node.level, node.key.clone(), !node.expanded)
    };
    store.nodes_mut()[index].expanded = expanded;
    if let Err(e) = states.put(scope, &node_key, level, expanded) {
        warn!(row_id, error = %e, "node state not persisted");
    }

    let range = store.descendant_range(index);
    if expanded {
        let depth = relative_child_depth.max(1);
        let base_level = level;
        let prefix_visible = store.nodes()[index].visible;
        for node in &mut store.nodes_mut()[range] {
            let rel = node.level - base_level;
            if rel > depth {
                continue;
            }
            node.visible = prefix_visible;
            node.expanded = rel < depth;
        }
    } else {
        for node in &mut store.nodes_mut()[range] {
            node.visible = false;
        }
    }

    Ok(ToggleOutcome {
        row_id,
        level,
        expanded,
        rank: adapter_rank(store, row_id),
    })
}

/// Make a node visible by force-expanding its ancestor chain, root to node.
///
/// Each ancestor is located by truncating the node's key to that ancestor's
/// level; exactly one level is opened per ancestor, so sibling subtrees keep
/// their own flags. Idempotent.
pub fn ensure_visible(
    store: &mut ListStore,
    states: &dyn NodeStateStore,
    scope: &StateScope,
    row_id: RowId,
) -> Result<()> {
    let index = store
        .index_of(row_id)
        .ok_or(ListError::UnknownNodeId(row_id))?;
    let (level, node_key) = {
        let node = &store.nodes()[index];
        (node.level, node.key.clone())
    };
    if level <= 1 {
        return Ok(());
    }

    let mut outermost_changed = None;
    for anc_level in 1..level {
        let anc_key = key::truncate_to_level(&node_key, anc_level);
        let Some(anc_row) = store.row_at(anc_level, anc_key) else {
            continue;
        };
        let Some(anc_index) = store.index_of(anc_row) else {
            continue;
        };
        if store.nodes()[anc_index].expanded {
            continue;
        }
        store.nodes_mut()[anc_index].expanded = true;
        if let Err(e) = states.put(scope, anc_key, anc_level, true) {
            warn!(row_id = anc_row, error = %e, "node state not persisted");
        }
        if outermost_changed.is_none() {
            outermost_changed = Some(anc_index);
        }
    }

    if let Some(changed) = outermost_changed {
        recompute_subtree(store, changed);
    }
    Ok(())
}

/// Bulk-set expansion: levels at or below `top_level` nesting stay visible,
/// everything deeper follows `expand`. Stored per-node states for the scope
/// are purged; the uniform state replaces them.
pub fn set_all(
    store: &mut ListStore,
    states: &dyn NodeStateStore,
    scope: &StateScope,
    top_level: usize,
    expand: bool,
) {
    for node in store.nodes_mut() {
        node.expanded = if node.level >= top_level {
            expand
        } else {
            true
        };
    }
    recompute_all(store);
    if let Err(e) = states.purge_style(scope) {
        warn!(error = %e, "node states not purged");
    }
}

/// 0-based rank of a node among currently visible rows, in navigation order.
/// A node that is not visible (or no longer exists) yields the total row
/// count, a valid "not visible" answer. Never fails.
pub fn adapter_rank(store: &ListStore, row_id: RowId) -> usize {
    match store.index_of(row_id) {
        Some(index) if store.nodes()[index].visible => store.nodes()[..index]
            .iter()
            .filter(|n| n.visible)
            .count(),
        _ => store.len(),
    }
}

/// Recompute visibility for the strict descendants of `index` from the
/// parent-chain recurrence `visible(n) = visible(parent) && expanded(parent)`.
fn recompute_subtree(store: &mut ListStore, index: usize) {
    let range = store.descendant_range(index);
    let base = &store.nodes()[index];
    let mut chain: Vec<(usize, bool)> = vec![(base.level, base.visible && base.expanded)];
    recompute_range(store, range, &mut chain);
}

/// Recompute visibility for the whole table.
pub(crate) fn recompute_all(store: &mut ListStore) {
    let mut chain: Vec<(usize, bool)> = vec![(0, true)];
    recompute_range(store, 0..store.len(), &mut chain);
}

fn recompute_range(
    store: &mut ListStore,
    range: std::ops::Range<usize>,
    chain: &mut Vec<(usize, bool)>,
) {
    for i in range {
        let node = &mut store.nodes_mut()[i];
        while chain.len() > 1 && chain[chain.len() - 1].0 >= node.level {
            chain.pop();
        }
        let visible = chain[chain.len() - 1].1;
        node.visible = visible;
        chain.push((node.level, visible && node.expanded));
    }
}

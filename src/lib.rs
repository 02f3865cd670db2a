//! Shelftree: Booklist Materialization Engine
//!
//! Turns a flat collection of book records plus a user-chosen ordered
//! hierarchy of grouping rules (a "style") into a materialized tree-shaped
//! listing with per-node expand/collapse state, hierarchical path keys,
//! windowed visible-row access, and targeted incremental patches.

pub mod build;
pub mod config;
pub mod error;
pub mod facade;
pub mod key;
pub mod logging;
pub mod row;
pub mod schema;
pub mod state;
pub mod store;
pub mod style;
pub mod types;
pub mod visibility;

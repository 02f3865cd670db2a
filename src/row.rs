//! Source rows
//!
//! The pre-joined input to a list build: one row per (book, membership)
//! combination, carrying every domain column the active style requires.
//! Producing the join is the entity store's responsibility; the builder is
//! agnostic to how it was made.

use crate::types::BookId;
use std::collections::HashMap;

/// One flattened input row.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub book_id: BookId,
    pub title: String,
    columns: HashMap<String, String>,
}

impl SourceRow {
    pub fn new(book_id: BookId, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            columns: HashMap::new(),
        }
    }

    /// Attach a domain column value. Builder-style for fixture and join code.
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.columns.insert(column.to_string(), value.into());
        self
    }

    /// Value of a domain column, if the join supplied one.
    pub fn column(&self, name: &str) -> Option<&str> {
        if name == crate::schema::columns::TITLE {
            return Some(&self.title);
        }
        self.columns.get(name).map(String::as_str)
    }
}

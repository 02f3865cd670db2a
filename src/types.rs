//! Core identifier types for the booklist materialization engine.

/// BookId: storage identifier of a book record, assigned by the entity store
pub type BookId = i64;

/// RowId: surrogate identifier of a materialized list row, stable within one build
pub type RowId = i64;

/// BookshelfId: storage identifier of a bookshelf, assigned by the entity store
pub type BookshelfId = i64;

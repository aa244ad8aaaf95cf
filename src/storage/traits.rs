//! Storage traits and error types
//!
//! This module defines the trait interface for relational table targets and
//! associated error types.

use crate::storage::TextTable;
use rusqlite::types::Value as SqlValue;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table {0} has no columns")]
    NoColumns(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A relational target that holds whole tables
///
/// Loading is replace-only: a table is dropped and rebuilt from scratch,
/// never merged into.
pub trait TableStore {
    /// Replaces `name` with the contents of `table`
    ///
    /// Column types are inferred from the text cells. Either the whole
    /// replacement lands or the previous table is left untouched.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn replace_table(&mut self, name: &str, table: &TextTable) -> StorageResult<usize>;

    /// Checks whether a table exists
    fn table_exists(&self, name: &str) -> StorageResult<bool>;

    /// Counts the rows of a table
    fn count_rows(&self, name: &str) -> StorageResult<u64>;

    /// Gets a table's column names in declaration order
    fn column_names(&self, name: &str) -> StorageResult<Vec<String>>;

    /// Reads every row of a table in insertion order
    fn fetch_rows(&self, name: &str) -> StorageResult<Vec<Vec<SqlValue>>>;
}

//! Storage module for the relational export target
//!
//! This module handles all database operations for the exporter, including:
//! - Opening the SQLite database
//! - Inferring column types from delimited text
//! - Replacing a table wholesale inside one transaction
//! - Reading tables back for statistics and verification

mod schema;
mod sqlite;
mod traits;

pub use schema::{infer_column_type, quote_identifier, ColumnType};
pub use sqlite::SqliteTableStore;
pub use traits::{StorageError, StorageResult, TableStore};

/// A table of untyped text cells, as read back from the CSV export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

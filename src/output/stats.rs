//! Statistics read back from the exported table
//!
//! This module provides functionality for extracting and displaying
//! export statistics from the storage layer.

use crate::storage::{StorageResult, TableStore};

/// Exported table summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatistics {
    /// Table the statistics were read from
    pub table_name: String,

    /// Number of rows in the table
    pub row_count: u64,

    /// Column names in declaration order
    pub columns: Vec<String>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `table_name` - The exported table
///
/// # Returns
///
/// * `Ok(TableStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Table missing or query failed
pub fn load_statistics(storage: &dyn TableStore, table_name: &str) -> StorageResult<TableStatistics> {
    let row_count = storage.count_rows(table_name)?;
    let columns = storage.column_names(table_name)?;

    Ok(TableStatistics {
        table_name: table_name.to_string(),
        row_count,
        columns,
    })
}

/// Formats statistics for the terminal
pub fn format_statistics(stats: &TableStatistics) -> String {
    let mut out = String::new();
    out.push_str("=== Export Statistics ===\n\n");
    out.push_str(&format!("Table: {}\n", stats.table_name));
    out.push_str(&format!("Rows: {}\n", stats.row_count));
    out.push_str(&format!("Columns ({}):\n", stats.columns.len()));
    for (i, column) in stats.columns.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, column));
    }
    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &TableStatistics) {
    print!("{}", format_statistics(stats));
}

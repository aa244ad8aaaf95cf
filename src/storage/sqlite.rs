//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the TableStore trait.

use crate::storage::schema::{create_table_sql, infer_column_type, insert_sql, quote_identifier};
use crate::storage::traits::{StorageError, StorageResult, TableStore};
use crate::storage::TextTable;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    /// Opens or creates a database file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteTableStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    fn require_table(&self, name: &str) -> StorageResult<()> {
        if self.table_exists(name)? {
            Ok(())
        } else {
            Err(StorageError::TableNotFound(name.to_string()))
        }
    }
}

impl TableStore for SqliteTableStore {
    fn replace_table(&mut self, name: &str, table: &TextTable) -> StorageResult<usize> {
        let width = table.columns.len();
        if width == 0 {
            return Err(StorageError::NoColumns(name.to_string()));
        }

        if let Some((row, cells)) = table
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(StorageError::RowWidth {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        let types: Vec<_> = (0..width)
            .map(|col| infer_column_type(table.rows.iter().map(|row| row[col].as_str())))
            .collect();
        let columns: Vec<_> = table.columns.iter().cloned().zip(types.iter().copied()).collect();

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(name)))?;
        tx.execute_batch(&create_table_sql(name, &columns))?;
        {
            let mut stmt = tx.prepare(&insert_sql(name, width))?;
            for row in &table.rows {
                let values = row.iter().zip(&types).map(|(cell, ty)| ty.to_sql(cell));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        tracing::debug!(
            "Replaced table {} ({} columns, {} rows)",
            name,
            width,
            table.rows.len()
        );

        Ok(table.rows.len())
    }

    fn table_exists(&self, name: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn count_rows(&self, name: &str) -> StorageResult<u64> {
        self.require_table(name)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn column_names(&self, name: &str) -> StorageResult<Vec<String>> {
        self.require_table(name)?;
        let stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT 0", quote_identifier(name)))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        Ok(names)
    }

    fn fetch_rows(&self, name: &str) -> StorageResult<Vec<Vec<SqlValue>>> {
        self.require_table(name)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY rowid",
            quote_identifier(name)
        ))?;
        let width = stmt.column_count();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

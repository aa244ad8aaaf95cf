//! Table exporter
//!
//! Loads every snapshot, flattens each record, writes the CSV table, then
//! loads that CSV into a relational table that is replaced wholesale.
//! Failures are logged and returned; nothing here retries or keeps partial output.

use crate::crawler::load_snapshots;
use crate::export::csv_table::{read_csv, write_csv};
use crate::export::flattener::{flatten, FlatRow};
use crate::export::schema::{header, FieldSpec, EXTENSION_FIELDS};
use crate::export::{ExportError, ExportResult};
use crate::storage::{SqliteTableStore, TableStore};
use std::path::{Path, PathBuf};

/// Exports the snapshot directory as CSV and as a SQLite table
#[derive(Debug, Clone)]
pub struct TableExporter {
    snapshot_dir: PathBuf,
    schema: &'static [FieldSpec],
}

impl TableExporter {
    /// Creates an exporter over a snapshot directory using [`EXTENSION_FIELDS`]
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self::with_schema(snapshot_dir, EXTENSION_FIELDS)
    }

    pub fn with_schema(snapshot_dir: impl Into<PathBuf>, schema: &'static [FieldSpec]) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            schema,
        }
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        self.schema
    }

    /// Loads and flattens every snapshot record
    pub fn flatten_snapshots(&self) -> ExportResult<Vec<FlatRow>> {
        let records = load_snapshots(&self.snapshot_dir)?;
        tracing::info!(
            "Loaded {} extensions from {}",
            records.len(),
            self.snapshot_dir.display()
        );
        Ok(records
            .iter()
            .map(|record| flatten(record, self.schema))
            .collect())
    }

    /// Writes the header and one row per snapshot record to `output`
    ///
    /// # Returns
    ///
    /// The number of data rows written
    pub fn export_csv(&self, output: &Path) -> ExportResult<usize> {
        let result = self.flatten_snapshots().and_then(|rows| {
            write_csv(output, &header(self.schema), &rows)?;
            Ok(rows.len())
        });

        match &result {
            Ok(count) => {
                tracing::info!("Successfully wrote {} records to {}", count, output.display())
            }
            Err(e) => tracing::error!("Error converting to CSV: {}", e),
        }
        result
    }

    /// Reads `csv_path` back and replaces `table_name` in the database at `database_path`
    ///
    /// # Returns
    ///
    /// The number of rows loaded
    pub fn export_table(
        &self,
        csv_path: &Path,
        database_path: &Path,
        table_name: &str,
    ) -> ExportResult<usize> {
        let result = SqliteTableStore::new(database_path)
            .map_err(ExportError::from)
            .and_then(|mut store| self.load_table(csv_path, &mut store, table_name));

        match &result {
            Ok(count) => tracing::info!(
                "Successfully exported {} rows to {} (table {})",
                count,
                database_path.display(),
                table_name
            ),
            Err(e) => tracing::error!("Error exporting to SQLite: {}", e),
        }
        result
    }

    /// Reads `csv_path` back and replaces `table_name` in any [`TableStore`]
    pub fn load_table(
        &self,
        csv_path: &Path,
        store: &mut dyn TableStore,
        table_name: &str,
    ) -> ExportResult<usize> {
        let table = read_csv(csv_path)?;
        tracing::debug!(
            "Read {} rows x {} columns from {}",
            table.row_count(),
            table.columns.len(),
            csv_path.display()
        );
        Ok(store.replace_table(table_name, &table)?)
    }
}

//! Export module: snapshots to CSV to SQLite
//!
//! - `schema`: the ordered output columns and where each value comes from
//! - `flattener`: one nested record to one fixed-width row
//! - `csv_table`: delimited-text write and read-back
//! - `exporter`: the two export steps over a snapshot directory

mod csv_table;
mod exporter;
mod flattener;
mod schema;

pub use csv_table::{read_csv, write_csv};
pub use exporter::TableExporter;
pub use flattener::{cell_text, flatten, FlatRow};
pub use schema::{header, Extraction, FieldSpec, Normalization, EXTENSION_FIELDS};

use crate::config::Config;
use crate::crawler::SnapshotError;
use crate::storage::StorageError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort an export run
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to load snapshots: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("CSV error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("CSV file {0} has no header row")]
    MissingHeader(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Outcome of a full export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Data rows written to the CSV table
    pub csv_rows: usize,

    /// Rows loaded into the relational table
    pub table_rows: usize,
}

/// Runs both export steps with the configured paths
///
/// The table step only runs after the CSV step succeeded, so a failed CSV
/// write never leads to a stale table load.
pub fn run_export(config: &Config) -> ExportResult<ExportReport> {
    let exporter = TableExporter::new(&config.crawler.snapshot_dir);
    let csv_path = Path::new(&config.output.csv_path);

    let csv_rows = exporter.export_csv(csv_path)?;
    let table_rows = exporter.export_table(
        csv_path,
        Path::new(&config.output.database_path),
        &config.output.table_name,
    )?;

    Ok(ExportReport {
        csv_rows,
        table_rows,
    })
}

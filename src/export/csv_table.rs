//! Delimited-text table I/O

use crate::export::flattener::{cell_text, FlatRow};
use crate::export::{ExportError, ExportResult};
use crate::storage::TextTable;
use std::path::Path;

/// Writes a header row followed by the flattened rows
pub fn write_csv(path: &Path, header: &[&str], rows: &[FlatRow]) -> ExportResult<()> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(header).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record(row.iter().map(cell_text))
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a delimited-text table back into header and text cells
///
/// Rows whose width differs from the header are an error.
pub fn read_csv(path: &Path) -> ExportResult<TextTable> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(String::from)
        .collect();

    if columns.is_empty() {
        return Err(ExportError::MissingHeader(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(TextTable { columns, rows })
}

//! Page snapshot persistence
//!
//! Each successfully fetched page is written as `<page>.json` under the
//! snapshot directory: a JSON array of extension records with the bulky
//! `versions` field removed. The directory is the only interface between the
//! crawl and export stages.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sub-field dropped from every record before it is persisted
pub const STRIPPED_FIELD: &str = "versions";

/// Errors reading or writing snapshot files
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Snapshot {0} is not a JSON array")]
    NotAnArray(PathBuf),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Writes page snapshots into a fixed directory
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for a given page
    pub fn path_for(&self, page: u32) -> PathBuf {
        self.dir.join(format!("{}.json", page))
    }

    /// Creates the snapshot directory if it is missing
    pub fn ensure_dir(&self) -> SnapshotResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Strips `versions` from every record and writes the page, replacing any
    /// earlier snapshot with the same number
    pub fn save(&self, mut extensions: Vec<Value>, page: u32) -> SnapshotResult<PathBuf> {
        for extension in &mut extensions {
            if let Some(record) = extension.as_object_mut() {
                record.remove(STRIPPED_FIELD);
            }
        }

        let path = self.path_for(page);
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        extensions
            .serialize(&mut serializer)
            .map_err(|source| SnapshotError::Json {
                path: path.clone(),
                source,
            })?;

        fs::write(&path, buf).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Lists the `*.json` snapshot files in a directory
///
/// Files named by page number come first in numeric order; any other
/// `.json` files follow in name order.
pub fn list_snapshots(dir: &Path) -> SnapshotResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SnapshotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort_by_key(|path| {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match stem.parse::<u64>() {
            Ok(page) => (0, page, stem),
            Err(_) => (1, 0, stem),
        }
    });

    Ok(files)
}

/// Reads one snapshot file
pub fn read_snapshot(path: &Path) -> SnapshotResult<Vec<Value>> {
    let content = fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_slice(&content).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(SnapshotError::NotAnArray(path.to_path_buf())),
    }
}

/// Loads and concatenates every snapshot in a directory
pub fn load_snapshots(dir: &Path) -> SnapshotResult<Vec<Value>> {
    let mut records = Vec::new();
    for path in list_snapshots(dir)? {
        let mut page = read_snapshot(&path)?;
        tracing::debug!("Loaded {} records from {}", page.len(), path.display());
        records.append(&mut page);
    }
    Ok(records)
}

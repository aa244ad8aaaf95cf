use crate::common::{create_test_config, extension};
use extension_harvest::crawler::SnapshotWriter;
use extension_harvest::export::{header, read_csv, run_export, ExportError, TableExporter};
use extension_harvest::storage::{SqliteTableStore, TableStore};
use extension_harvest::EXTENSION_FIELDS;
use rusqlite::types::Value as SqlValue;
use serde_json::json;
use tempfile::TempDir;

fn seed_snapshots(dir: &std::path::Path, pages: &[Vec<serde_json::Value>]) {
    let writer = SnapshotWriter::new(dir);
    writer.ensure_dir().unwrap();
    for (i, page) in pages.iter().enumerate() {
        writer.save(page.clone(), i as u32 + 1).unwrap();
    }
}

#[test]
fn test_table_mirrors_csv() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 10);
    seed_snapshots(
        std::path::Path::new(&config.crawler.snapshot_dir),
        &[
            vec![extension("a", 100), extension("b", 200)],
            vec![extension("c", 300), json!({"extensionId": "bare"})],
        ],
    );

    let report = run_export(&config).unwrap();
    assert_eq!(report.csv_rows, 4);
    assert_eq!(report.table_rows, 4);

    let csv = read_csv(std::path::Path::new(&config.output.csv_path)).unwrap();
    let store = SqliteTableStore::new(std::path::Path::new(&config.output.database_path)).unwrap();

    assert_eq!(store.count_rows("vscode_extensions").unwrap(), csv.rows.len() as u64);
    assert_eq!(store.column_names("vscode_extensions").unwrap(), csv.columns);
    assert_eq!(csv.columns, header(EXTENSION_FIELDS));

    let rows = store.fetch_rows("vscode_extensions").unwrap();
    assert_eq!(rows[0][3], SqlValue::Text("a".to_string()));
    assert_eq!(rows[0][6], SqlValue::Text("2023-04-05".to_string()));
    assert_eq!(rows[0][8], SqlValue::Integer(100));
    assert_eq!(rows[0][9], SqlValue::Real(4.25));
    assert_eq!(
        rows[0][14],
        SqlValue::Text(r#"["Programming Languages","Linters"]"#.to_string())
    );
    assert_eq!(rows[0][17], SqlValue::Integer(1));
    assert_eq!(rows[3][3], SqlValue::Text("bare".to_string()));
    assert_eq!(rows[3][8], SqlValue::Null);
}

#[test]
fn test_export_table_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 10);
    seed_snapshots(
        std::path::Path::new(&config.crawler.snapshot_dir),
        &[vec![extension("a", 1), extension("b", 2)]],
    );

    let exporter = TableExporter::new(&config.crawler.snapshot_dir);
    let csv_path = std::path::Path::new(&config.output.csv_path);
    let db_path = std::path::Path::new(&config.output.database_path);
    exporter.export_csv(csv_path).unwrap();

    exporter.export_table(csv_path, db_path, "exts").unwrap();
    let first = SqliteTableStore::new(db_path).unwrap().fetch_rows("exts").unwrap();
    exporter.export_table(csv_path, db_path, "exts").unwrap();
    let second = SqliteTableStore::new(db_path).unwrap().fetch_rows("exts").unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_export_replaces_larger_table() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 10);
    let snapshot_dir = std::path::Path::new(&config.crawler.snapshot_dir);

    seed_snapshots(
        snapshot_dir,
        &[vec![extension("a", 1), extension("b", 2), extension("c", 3)]],
    );
    run_export(&config).unwrap();

    seed_snapshots(snapshot_dir, &[vec![extension("z", 9)]]);
    run_export(&config).unwrap();

    let store = SqliteTableStore::new(std::path::Path::new(&config.output.database_path)).unwrap();
    assert_eq!(store.count_rows("vscode_extensions").unwrap(), 1);
    let rows = store.fetch_rows("vscode_extensions").unwrap();
    assert_eq!(rows[0][3], SqlValue::Text("z".to_string()));
}

#[test]
fn test_failed_csv_export_skips_table() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 10);
    let snapshot_dir = std::path::Path::new(&config.crawler.snapshot_dir);
    std::fs::create_dir_all(snapshot_dir).unwrap();
    std::fs::write(snapshot_dir.join("1.json"), r#"{"not": "an array"}"#).unwrap();

    let result = run_export(&config);

    assert!(matches!(result, Err(ExportError::Snapshot(_))));
    assert!(!std::path::Path::new(&config.output.database_path).exists());
}

#[test]
fn test_empty_snapshot_dir_exports_header_only() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), 10);
    std::fs::create_dir_all(&config.crawler.snapshot_dir).unwrap();

    let report = run_export(&config).unwrap();
    assert_eq!(report.csv_rows, 0);

    let csv = read_csv(std::path::Path::new(&config.output.csv_path)).unwrap();
    assert_eq!(csv.columns.len(), EXTENSION_FIELDS.len());
    assert!(csv.rows.is_empty());

    let store = SqliteTableStore::new(std::path::Path::new(&config.output.database_path)).unwrap();
    assert_eq!(store.count_rows("vscode_extensions").unwrap(), 0);
}

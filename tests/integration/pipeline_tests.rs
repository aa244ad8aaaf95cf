use crate::common::{create_test_config, extension, page_body, PageNumber};
use extension_harvest::crawler::crawl;
use extension_harvest::export::{read_csv, run_export};
use extension_harvest::storage::{SqliteTableStore, TableStore};
use extension_harvest::TerminationReason;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_then_export() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(PageNumber(1))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![
            extension("a", 1),
            extension("b", 2),
            extension("c", 3),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(PageNumber(2))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![])))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), dir.path(), 100);

    let report = crawl(&config).await.expect("Crawl setup failed");
    assert_eq!(report.total_extensions, 3);
    assert_eq!(report.last_page, 2);
    assert_eq!(report.termination, TerminationReason::Exhausted);

    let export = run_export(&config).expect("Export failed");
    assert_eq!(export.csv_rows, 3);
    assert_eq!(export.table_rows, 3);

    let csv_text = std::fs::read_to_string(&config.output.csv_path).unwrap();
    assert_eq!(csv_text.lines().count(), 4);
    assert!(csv_text.starts_with("publisherId,publisherName,publisherDisplayName,extensionId"));

    let csv = read_csv(Path::new(&config.output.csv_path)).unwrap();
    let store = SqliteTableStore::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(store.count_rows("vscode_extensions").unwrap(), 3);
    assert_eq!(store.column_names("vscode_extensions").unwrap(), csv.columns);
}

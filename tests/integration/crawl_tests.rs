use crate::common::{create_test_config, extension, page_body, request_page, PageNumber};
use extension_harvest::crawler::{read_snapshot, Coordinator, FetchError, PageFetcher};
use extension_harvest::TerminationReason;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/_apis/public/gallery/extensionquery";

async fn mount_page(server: &MockServer, page: u32, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(PageNumber(page))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_until_empty_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_json(page_body(vec![extension("a", 10), extension("b", 20)])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(page_body(vec![extension("c", 30)])),
    )
    .await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(page_body(vec![])),
    )
    .await;

    let config = create_test_config(&server.uri(), dir.path(), 100);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let report = coordinator.run().await;

    assert_eq!(report.total_extensions, 3);
    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.last_page, 3);
    assert_eq!(report.termination, TerminationReason::Exhausted);
    assert!(report.failed_saves.is_empty());

    let snapshot_dir = dir.path().join("extensions");
    let mut files: Vec<String> = std::fs::read_dir(&snapshot_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["1.json", "2.json"]);

    let page_one = read_snapshot(&snapshot_dir.join("1.json")).unwrap();
    assert_eq!(page_one.len(), 2);
    assert!(page_one.iter().all(|ext| ext.get("versions").is_none()));
    assert_eq!(page_one[0]["extensionId"], "a");
}

#[tokio::test]
async fn test_requests_differ_only_in_page_number() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_body(vec![extension("a", 1)])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(page_body(vec![])),
    )
    .await;

    let config = create_test_config(&server.uri(), dir.path(), 100);
    Coordinator::new(&config).unwrap().run().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(request_page(&requests[0]), Some(1));
    assert_eq!(request_page(&requests[1]), Some(2));

    let mut first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    first["filters"][0]["pageNumber"] = serde_json::json!(2);
    assert_eq!(first, second);
    assert_eq!(second["filters"][0]["pageSize"], 1000);
    assert_eq!(second["flags"], 870);
}

#[tokio::test]
async fn test_server_error_ends_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_json(page_body(vec![extension("a", 1), extension("b", 2)])),
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(503)).await;

    let config = create_test_config(&server.uri(), dir.path(), 100);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 2);
    assert_eq!(report.pages_saved, 1);
    assert_eq!(report.last_page, 2);
    assert!(report.termination.is_failure());
    assert!(dir.path().join("extensions/1.json").exists());
    assert!(!dir.path().join("extensions/2.json").exists());
}

#[tokio::test]
async fn test_malformed_response_ends_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "busy"})),
    )
    .await;

    let config = create_test_config(&server.uri(), dir.path(), 100);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 0);
    assert_eq!(report.pages_saved, 0);
    assert!(matches!(report.termination, TerminationReason::FetchFailed(_)));
}

#[tokio::test]
async fn test_timeout_ends_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_json(page_body(vec![extension("a", 1)]))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut config = create_test_config(&server.uri(), dir.path(), 100);
    config.api.timeout_secs = 1;
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 0);
    assert!(report.termination.is_failure());
}

#[tokio::test]
async fn test_page_limit_stops_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![extension("a", 1)])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), dir.path(), 2);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 2);
    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.last_page, 2);
    assert_eq!(report.termination, TerminationReason::PageLimit);
}

#[tokio::test]
async fn test_snapshot_write_failure_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(page_body(vec![extension("a", 1)])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(page_body(vec![extension("b", 2)])),
    )
    .await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(page_body(vec![])),
    )
    .await;

    // A plain file where the snapshot directory should be
    let blocked = dir.path().join("extensions");
    std::fs::write(&blocked, "not a directory").unwrap();

    let config = create_test_config(&server.uri(), dir.path(), 100);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 2);
    assert_eq!(report.pages_saved, 0);
    assert_eq!(report.failed_saves, vec![1, 2]);
    assert_eq!(report.termination, TerminationReason::Exhausted);
}

#[tokio::test]
async fn test_zero_page_ceiling_sends_no_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![extension("a", 1)])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), dir.path(), 0);
    let report = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(report.total_extensions, 0);
    assert_eq!(report.pages_saved, 0);
    assert_eq!(report.last_page, 0);
    assert_eq!(report.termination, TerminationReason::PageLimit);
    assert!(server.received_requests().await.unwrap().is_empty());

    let snapshots = std::fs::read_dir(dir.path().join("extensions"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(snapshots, 0);
}

#[tokio::test]
async fn test_connect_failure_keeps_underlying_cause() {
    let dir = TempDir::new().unwrap();

    // Reserve a port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = create_test_config(&format!("http://127.0.0.1:{}", port), dir.path(), 5);
    let fetcher = PageFetcher::new(&config.api).unwrap();

    match fetcher.fetch(1).await {
        Err(FetchError::Transport { page, message }) => {
            assert_eq!(page, 1);
            assert_ne!(message, "Connection refused");
            assert!(message.contains(&port.to_string()), "message: {}", message);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

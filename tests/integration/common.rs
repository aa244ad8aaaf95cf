use extension_harvest::config::Config;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::{Match, Request};

/// Matches query requests for one page number
pub struct PageNumber(pub u32);

impl Match for PageNumber {
    fn matches(&self, request: &Request) -> bool {
        request_page(request) == Some(self.0)
    }
}

/// Page number carried by a recorded query request
pub fn request_page(request: &Request) -> Option<u32> {
    let body: Value = serde_json::from_slice(&request.body).ok()?;
    body["filters"][0]["pageNumber"]
        .as_u64()
        .map(|page| page as u32)
}

/// Creates a test configuration pointed at the mock server and a scratch directory
pub fn create_test_config(server_uri: &str, dir: &Path, max_pages: u32) -> Config {
    let mut config = Config::default();
    config.api.url = format!("{}/_apis/public/gallery/extensionquery", server_uri);
    config.api.timeout_secs = 2;
    config.crawler.max_pages = max_pages;
    config.crawler.snapshot_dir = dir.join("extensions").to_string_lossy().into_owned();
    config.output.csv_path = dir.join("extensions.csv").to_string_lossy().into_owned();
    config.output.database_path = dir.join("extensions.db").to_string_lossy().into_owned();
    config.output.table_name = "vscode_extensions".to_string();
    config
}

/// A marketplace-shaped extension record
pub fn extension(id: &str, installs: u64) -> Value {
    json!({
        "publisher": {
            "publisherId": format!("pub-{}", id),
            "publisherName": "acme",
            "displayName": "ACME Corp"
        },
        "extensionId": id,
        "extensionName": format!("ext-{}", id),
        "displayName": format!("Extension {}", id),
        "lastUpdated": "2023-04-05T06:07:08.9Z",
        "publishedDate": "2019-01-02T03:04:05Z",
        "categories": ["Programming Languages", "Linters"],
        "tags": ["rust", "lint"],
        "hasIcon": true,
        "statistics": [
            {"statisticName": "install", "value": installs},
            {"statisticName": "averagerating", "value": 4.25},
            {"statisticName": "ratingcount", "value": 12}
        ],
        "versions": [
            {"version": "1.2.3", "files": [{"assetType": "Microsoft.VisualStudio.Services.Icons.Default"}]}
        ]
    })
}

/// A successful query response body holding the given extensions
pub fn page_body(extensions: Vec<Value>) -> Value {
    json!({
        "results": [{
            "extensions": extensions,
            "pagingToken": null,
            "resultMetadata": []
        }]
    })
}

use serde::Deserialize;

/// Default marketplace extension-query endpoint
pub const DEFAULT_API_URL: &str =
    "https://marketplace.visualstudio.com/_apis/public/gallery/extensionquery";

/// Main configuration structure for Extension-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote query endpoint and the fixed query criteria sent with every page
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Extension-query endpoint URL
    pub url: String,

    /// Accept header, carries the gallery API version
    pub accept: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Extensions requested per page
    pub page_size: u32,

    /// Gallery query flags (bitmask of included sub-fields)
    pub flags: u32,

    /// Sort column identifier
    pub sort_by: u32,

    /// Sort order identifier
    pub sort_order: u32,

    /// Filter direction identifier
    pub direction: u32,

    /// Installation target the catalog is filtered by
    pub target: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            accept: "application/json;api-version=3.0-preview.1".to_string(),
            user_agent: format!("extension-harvest/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            page_size: 1000,
            flags: 870,
            sort_by: 4,
            sort_order: 0,
            direction: 2,
            target: "Microsoft.VisualStudio.Code".to_string(),
        }
    }
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Upper bound on pages requested in one run
    pub max_pages: u32,

    /// Directory receiving one `<page>.json` snapshot per page
    pub snapshot_dir: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            snapshot_dir: "extensions".to_string(),
        }
    }
}

/// Export targets
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the CSV table
    pub csv_path: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Table replaced on every export
    pub table_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "vscode_extensions.csv".to_string(),
            database_path: "vscode_extensions.db".to_string(),
            table_name: "vscode_extensions".to_string(),
        }
    }
}

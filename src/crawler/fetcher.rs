//! Page fetcher implementation
//!
//! This module issues the per-page gallery queries, including:
//! - Building the HTTP client with user agent, Accept header and timeout
//! - POSTing one query per page number
//! - Classifying transport, status and response-shape failures
//!
//! A failure is returned to the caller as a [`FetchError`] value; nothing here
//! retries.

use crate::config::ApiConfig;
use crate::crawler::query::QueryTemplate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain one page of extensions
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for page {page}")]
    Timeout { page: u32 },

    #[error("Transport error for page {page}: {message}")]
    Transport { page: u32, message: String },

    #[error("HTTP {status} for page {page}")]
    Status { page: u32, status: u16 },

    #[error("Unexpected response shape for page {page}: {message}")]
    Shape { page: u32, message: String },
}

impl FetchError {
    /// Page number the failure belongs to
    pub fn page(&self) -> u32 {
        match self {
            Self::Timeout { page }
            | Self::Transport { page, .. }
            | Self::Status { page, .. }
            | Self::Shape { page, .. } => *page,
        }
    }

    /// Returns true if the response arrived but did not have the expected structure
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}

/// Expected success body: `{"results": [{"extensions": [...]}, ...]}`
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    extensions: Vec<Value>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(accept) = HeaderValue::from_str(&config.accept) {
        headers.insert(ACCEPT, accept);
    } else {
        tracing::warn!("Ignoring invalid Accept header value: {}", config.accept);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Extracts `results[0].extensions` from a response body
///
/// Any other structure, including an empty `results` list, is a
/// [`FetchError::Shape`].
pub fn parse_query_response(page: u32, body: &[u8]) -> Result<Vec<Value>, FetchError> {
    let response: QueryResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::Shape {
            page,
            message: e.to_string(),
        })?;

    response
        .results
        .into_iter()
        .next()
        .map(|result| result.extensions)
        .ok_or_else(|| FetchError::Shape {
            page,
            message: "empty results list".to_string(),
        })
}

/// Fetches catalog pages from the gallery query endpoint
///
/// One request is in flight at a time; the query body is rebuilt from the
/// template for every call.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    endpoint: String,
    template: QueryTemplate,
}

impl PageFetcher {
    /// Creates a fetcher from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            endpoint: config.url.clone(),
            template: QueryTemplate::from_config(config),
        }
    }

    /// The query template sent with every page
    pub fn template(&self) -> &QueryTemplate {
        &self.template
    }

    /// Fetches one page of extensions
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - The page's extension records (possibly empty)
    /// * `Err(FetchError)` - Transport failure, non-success status, or malformed body
    pub async fn fetch(&self, page: u32) -> Result<Vec<Value>, FetchError> {
        let query = self.template.for_page(page);
        tracing::debug!("POST {} (page {})", self.endpoint, page);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&query)
            .send()
            .await
            .map_err(|e| classify_transport_error(page, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(page, e))?;

        parse_query_response(page, &body)
    }
}

fn classify_transport_error(page: u32, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout { page }
    } else {
        FetchError::Transport {
            page,
            message: error.to_string(),
        }
    }
}

use crate::config::types::{ApiConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the remote query configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api url '{}': {}", config.url, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "api url '{}' must use http or https",
            config.url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.page_size == 0 {
        return Err(ConfigError::Validation("page_size must be >= 1".to_string()));
    }

    if config.target.is_empty() {
        return Err(ConfigError::Validation("target cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.snapshot_dir.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation("csv_path cannot be empty".to_string()));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    validate_table_name(&config.table_name)
}

/// Validates a table name: alphanumerics and underscores, not starting with a digit
pub(crate) fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "table_name cannot be empty".to_string(),
        ));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "table_name cannot start with a digit, got '{}'",
            name
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "table_name must contain only alphanumeric characters and underscores, got '{}'",
            name
        )));
    }

    Ok(())
}

use crate::config::types::{Config, ScraperConfig, SessionConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Only operational settings are checked. Missing dates or an empty query
/// are left to the query compiler, which drops those clauses.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.max_results_per_page < 1 {
        return Err(ConfigError::Validation(
            "max_results_per_page must be >= 1, got 0".to_string(),
        ));
    }

    validate_scraper_config(&config.scraper)?;
    validate_session_config(&config.session)?;
    Ok(())
}

/// Validates scraper configuration
pub fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.workers == Some(0) {
        return Err(ConfigError::Validation(
            "workers must be >= 1 when set".to_string(),
        ));
    }

    if config.limit == Some(0) {
        return Err(ConfigError::Validation(
            "limit must be >= 1 when set".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.save_html && config.debug_dir.is_empty() {
        return Err(ConfigError::Validation(
            "debug_dir cannot be empty when save_html is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates session configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    Ok(())
}

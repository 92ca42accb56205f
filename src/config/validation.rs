//! Semantic validation of parsed configuration

use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Checks that the crawler limits are usable and that the user agent and
/// output sections carry real values, since an empty user agent or database
/// path only fails much later at run time.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.rate_limit_per_sec == 0 {
        return Err(ConfigError::Validation(
            "rate-limit-per-sec must be at least 1".to_string(),
        ));
    }

    if config.crawler.max_concurrent_checks == 0 {
        return Err(ConfigError::Validation(
            "max-concurrent-checks must be at least 1".to_string(),
        ));
    }

    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.user_agent.crawler_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name must not be empty".to_string(),
        ));
    }

    if !config.user_agent.contact_url.starts_with("http://")
        && !config.user_agent.contact_url.starts_with("https://")
    {
        return Err(ConfigError::Validation(format!(
            "contact-url must be an http(s) URL, got: {}",
            config.user_agent.contact_url
        )));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}

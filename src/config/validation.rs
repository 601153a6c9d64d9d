use crate::config::types::{Config, CrawlerConfig, OutputConfig, PolitenessConfig};
use crate::ConfigError;
use url::Url;

/// Largest accepted politeness delay, in seconds
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_politeness_config(&config.politeness)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl mode configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            config.seed_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            config.seed_url
        )));
    }

    Ok(())
}

/// Validates delay bounds and the request timeout
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("min_delay", config.min_delay),
        ("max_delay", config.max_delay),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds, got {}",
                name, value
            )));
        }
        if value > MAX_DELAY_SECS {
            return Err(ConfigError::Validation(format!(
                "{} cannot exceed {} seconds, got {}",
                name, MAX_DELAY_SECS, value
            )));
        }
    }

    if config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "min_delay ({}) cannot exceed max_delay ({})",
            config.min_delay, config.max_delay
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("links_path", &config.links_path),
        ("progress_path", &config.progress_path),
        ("results_path", &config.results_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

use crate::config::types::{Config, FetchConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates listing site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_delay_min_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "page-delay-min-secs must be >= 0, got {}",
            config.page_delay_min_secs
        )));
    }

    if config.page_delay_max_secs < config.page_delay_min_secs {
        return Err(ConfigError::Validation(format!(
            "page-delay-max-secs ({}) must be >= page-delay-min-secs ({})",
            config.page_delay_max_secs, config.page_delay_min_secs
        )));
    }

    Ok(())
}

/// Validates fetch layer configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.backoff_factor <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-factor must be > 0, got {}",
            config.backoff_factor
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.cache_ttl_hours < 0 {
        return Err(ConfigError::Validation(format!(
            "cache-ttl-hours must be >= 0, got {}",
            config.cache_ttl_hours
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_path.is_empty() {
        return Err(ConfigError::Validation(
            "data-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ProxyConfig;

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                base_url: "https://listings.example.com/cars/".to_string(),
                page_delay_min_secs: 20.0,
                page_delay_max_secs: 60.0,
            },
            fetch: FetchConfig::default(),
            output: OutputConfig {
                data_path: "./data/vehicles.json".to_string(),
            },
            proxy: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = valid_config();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = valid_config();
        config.site.base_url = "ftp://listings.example.com/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_delay_bounds() {
        let mut config = valid_config();
        config.site.page_delay_min_secs = 60.0;
        config.site.page_delay_max_secs = 20.0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = valid_config();
        config.fetch.max_retries = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_backoff_rejected() {
        let mut config = valid_config();
        config.fetch.backoff_factor = 0.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_data_path_rejected() {
        let mut config = valid_config();
        config.output.data_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_partial_proxy_is_valid_config() {
        // Missing credentials degrade at client build time, they are not a
        // configuration error.
        let mut config = valid_config();
        config.proxy = Some(ProxyConfig {
            username: Some("user".to_string()),
            ..ProxyConfig::default()
        });
        assert!(validate(&config).is_ok());
    }
}

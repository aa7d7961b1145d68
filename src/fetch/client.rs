//! HTTP client construction
//!
//! The client carries the browser-like header set on every request; the
//! User-Agent is picked per request from a rotating pool. An authenticated
//! forward proxy is attached when the full credential set is configured,
//! otherwise the client degrades to a direct connection with a warning.

use crate::config::{FetchConfig, ProxyConfig};
use crate::fetch::FetchError;
use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;

/// Used when the pool yields nothing
pub const FALLBACK_USER_AGENT: &str = "Mozilla/5.0";

/// Desktop browser User-Agent strings, rotated per request
const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
];

/// Picks a pseudo-random User-Agent from the pool
pub fn random_user_agent() -> &'static str {
    USER_AGENT_POOL
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_USER_AGENT)
}

/// Builds the HTTP client used for all page fetches
///
/// # Arguments
///
/// * `config` - Fetch layer configuration (timeout)
/// * `referer` - The listing base URL, sent as the Referer header
/// * `proxy` - Optional proxy credentials; incomplete credentials are
///   logged and ignored, never fatal
pub fn build_http_client(
    config: &FetchConfig,
    referer: &str,
    proxy: Option<&ProxyConfig>,
) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    match proxy {
        Some(proxy) => match proxy.credentials() {
            Some((endpoint, username, password)) => {
                tracing::info!("Routing requests through proxy at {}", endpoint);
                let proxy = reqwest::Proxy::all(&endpoint)
                    .map_err(FetchError::ClientBuild)?
                    .basic_auth(username, password);
                builder = builder.proxy(proxy);
            }
            None => {
                tracing::warn!("Proxy credentials not fully provided. Proceeding without proxy.");
            }
        },
        None => {
            tracing::debug!("No proxy configured");
        }
    }

    builder.build().map_err(FetchError::ClientBuild)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_comes_from_pool() {
        for _ in 0..20 {
            let ua = random_user_agent();
            assert!(USER_AGENT_POOL.contains(&ua));
        }
    }

    #[test]
    fn test_build_client_without_proxy() {
        let client = build_http_client(&FetchConfig::default(), "https://example.com/", None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_with_partial_proxy_degrades() {
        let proxy = ProxyConfig {
            host: Some("proxy.example.com".to_string()),
            ..ProxyConfig::default()
        };
        let client =
            build_http_client(&FetchConfig::default(), "https://example.com/", Some(&proxy));
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_with_full_proxy() {
        let proxy = ProxyConfig {
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
            host: Some("proxy.example.com".to_string()),
            port: Some(8080),
        };
        let client =
            build_http_client(&FetchConfig::default(), "https://example.com/", Some(&proxy));
        assert!(client.is_ok());
    }
}

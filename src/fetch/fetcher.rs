//! Cached, retrying page fetcher

use crate::config::{FetchConfig, ProxyConfig};
use crate::fetch::{backoff_delay, build_http_client, random_user_agent, FetchError, PageCache};
use reqwest::header::USER_AGENT;
use reqwest::Client;

/// Fetches page bodies with caching and retry
///
/// A cache hit returns immediately without touching the network. On a miss
/// the URL is requested with a freshly selected User-Agent; any non-2xx
/// status or transport failure is retried with exponential backoff and
/// jitter until `max_retries` attempts are exhausted.
pub struct Fetcher {
    client: Client,
    cache: PageCache,
    max_retries: u32,
    backoff_factor: f64,
}

impl Fetcher {
    /// Creates a fetcher from fetch configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Retry, timeout, and cache TTL settings
    /// * `referer` - The listing base URL, sent as the Referer header
    /// * `proxy` - Optional forward proxy credentials
    pub fn new(
        config: &FetchConfig,
        referer: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self, FetchError> {
        let client = build_http_client(config, referer, proxy)?;
        Ok(Self {
            client,
            cache: PageCache::new(config.cache_ttl_hours),
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
        })
    }

    /// Retrieves the body for `url`, from cache when fresh
    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.cache.get(url) {
            tracing::info!("Using cached content for {}", url);
            return Ok(body.to_string());
        }

        for attempt in 1..=self.max_retries {
            match self.request(url).await {
                Ok(body) => {
                    self.cache.insert(url, body.clone());
                    tracing::info!("Successfully retrieved {}", url);
                    return Ok(body);
                }
                Err(e) => {
                    if attempt == self.max_retries {
                        break;
                    }
                    let delay = backoff_delay(self.backoff_factor, attempt);
                    tracing::warn!(
                        "Request failed ({}/{}) for {}: {}. Retrying in {:.2}s",
                        attempt,
                        self.max_retries,
                        url,
                        e,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_retries,
        })
    }

    /// Issues one GET request with a rotated User-Agent
    async fn request(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

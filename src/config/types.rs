use serde::Deserialize;

/// Main configuration structure for Kerbside
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    /// Optional forward proxy. Absent or incomplete credentials mean the
    /// harvester proceeds proxy-less with a warning.
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

/// Listing site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the first listing page. Subsequent pages are derived
    /// from it (`<base>page-<n>/`).
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Lower bound of the random inter-page delay (seconds)
    #[serde(rename = "page-delay-min-secs", default = "default_delay_min")]
    pub page_delay_min_secs: f64,

    /// Upper bound of the random inter-page delay (seconds)
    #[serde(rename = "page-delay-max-secs", default = "default_delay_max")]
    pub page_delay_max_secs: f64,
}

/// Fetch layer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Maximum attempts per URL before the fetch is considered failed
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base factor for exponential backoff (seconds)
    #[serde(rename = "backoff-factor", default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long a cached response body stays fresh (hours)
    #[serde(rename = "cache-ttl-hours", default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON dataset checkpoint file
    #[serde(rename = "data-path")]
    pub data_path: String,
}

/// Forward proxy credentials
///
/// All four fields must be present for the proxy to be used; a partial set
/// degrades to a direct connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ProxyConfig {
    /// Returns `(endpoint, username, password)` when every credential is
    /// present, otherwise `None`.
    pub fn credentials(&self) -> Option<(String, &str, &str)> {
        match (&self.username, &self.password, &self.host, self.port) {
            (Some(user), Some(pass), Some(host), Some(port)) => {
                Some((format!("http://{}:{}", host, port), user, pass))
            }
            _ => None,
        }
    }
}

fn default_delay_min() -> f64 {
    20.0
}

fn default_delay_max() -> f64 {
    60.0
}

fn default_max_retries() -> u32 {
    5
}

fn default_backoff_factor() -> f64 {
    0.5
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_hours() -> i64 {
    24
}

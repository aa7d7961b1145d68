//! Fetch-cache layer
//!
//! This module handles all network retrieval for the harvester, including:
//! - Building HTTP clients with browser-like headers and optional proxy
//! - Rotating User-Agent strings per request
//! - Memoizing response bodies in a TTL-bounded cache
//! - Retrying transient failures with exponential backoff and jitter

mod cache;
mod client;
mod fetcher;

pub use cache::PageCache;
pub use client::{build_http_client, random_user_agent, FALLBACK_USER_AGENT};
pub use fetcher::Fetcher;

use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx response. Treated as transient and retried.
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Transport failure (timeout, connection reset, DNS). Retried.
    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Terminal: every attempt for this URL failed.
    #[error("Failed to retrieve {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Computes the retry delay for the given attempt (1-based)
///
/// `factor * 2^(attempt-1) + uniform(0,1)` seconds. The random component
/// keeps retries from synchronizing and varies the request cadence.
pub fn backoff_delay(factor: f64, attempt: u32) -> Duration {
    let exponential = factor * f64::powi(2.0, attempt.saturating_sub(1) as i32);
    let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
    Duration::from_secs_f64(exponential + jitter)
}

//! Harvest coordinator - per-page cycle and stop conditions

use crate::config::Config;
use crate::dataset::{page_key, reconcile, Dataset, DatasetStore};
use crate::extract::{extract_page, is_blocked, Record};
use crate::fetch::{backoff_delay, Fetcher};
use crate::run::RunStats;
use crate::HarvestError;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Why a run ended
///
/// Every run ends in one of these; failures below the page level never
/// escape as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A page yielded no listing fragments: natural end of pagination
    StoppedEmpty,

    /// The anti-bot verification marker appeared: the source has revoked
    /// access and an operator should react
    StoppedBlocked,

    /// A page could not be retrieved after every outer attempt
    StoppedFetchExhausted,
}

impl RunOutcome {
    /// True when the run ended at the natural end of pagination
    pub fn is_natural_end(&self) -> bool {
        matches!(self, Self::StoppedEmpty)
    }

    /// True when the source actively blocked the harvester
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::StoppedBlocked)
    }
}

/// Final report of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stats: RunStats,
    /// Pages fully processed (fetched, reconciled, persisted)
    pub pages_processed: u32,
    pub dataset_size: usize,
}

/// Drives the harvest: one page at a time, fetch through persist
///
/// The harvester owns the fetcher (and through it the response cache), the
/// in-memory dataset, and the storage collaborator. Pages are processed
/// strictly sequentially; the only suspension points are retry backoff and
/// the inter-page delay.
pub struct Harvester<S: DatasetStore> {
    config: Config,
    fetcher: Fetcher,
    store: S,
    dataset: Dataset,
    stats: RunStats,
}

impl<S: DatasetStore> Harvester<S> {
    /// Creates a harvester, loading the persisted dataset
    pub fn new(config: Config, store: S) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::new(
            &config.fetch,
            &config.site.base_url,
            config.proxy.as_ref(),
        )?;
        let dataset = store.load();

        Ok(Self {
            config,
            fetcher,
            store,
            dataset,
            stats: RunStats::default(),
        })
    }

    /// The cumulative dataset in its current in-memory state
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Runs the harvest until a stop condition is reached
    ///
    /// Page numbers start at 1 and increase without an upper bound; the
    /// loop ends only through one of the [`RunOutcome`] conditions. The
    /// dataset is persisted after every page, so an interrupted run loses
    /// at most the in-flight page.
    pub async fn run(&mut self) -> RunSummary {
        let start = Instant::now();
        let mut pages_processed = 0u32;
        let mut page = 1u32;

        let outcome = loop {
            let page_start = Instant::now();
            let url = build_page_url(&self.config.site.base_url, page);
            tracing::info!("Harvesting page {}...", page);

            let Some(body) = self.fetch_with_retries(&url, page).await else {
                tracing::error!(
                    "Failed to retrieve page {} after {} attempts.",
                    page,
                    self.config.fetch.max_retries
                );
                break RunOutcome::StoppedFetchExhausted;
            };

            let extraction = extract_page(&body);
            if extraction.card_count == 0 {
                if is_blocked(&body) {
                    tracing::error!(
                        "Anti-bot verification detected on page {}! The source has revoked access.",
                        page
                    );
                    break RunOutcome::StoppedBlocked;
                }
                tracing::info!("No listing fragments on page {}. Stopping.", page);
                break RunOutcome::StoppedEmpty;
            }

            let page_records = key_by_listing(extraction.records, page);
            let outcome = reconcile(&mut self.dataset, &page_records, page);
            tracing::info!(
                "Page {} results: {} updated, {} added, {} removed",
                page,
                outcome.updated.len(),
                outcome.added.len(),
                outcome.removed.len()
            );
            self.stats.absorb(&outcome);

            if let Err(e) = self.store.save(&self.dataset) {
                tracing::error!(
                    "Failed to persist dataset: {}. Continuing with in-memory state; \
                     changes since the last checkpoint are at risk.",
                    e
                );
            }

            pages_processed += 1;
            tracing::info!(
                "Processed page {} in {:.2}s",
                page,
                page_start.elapsed().as_secs_f64()
            );

            self.pause_between_pages().await;
            page += 1;
        };

        let summary = RunSummary {
            outcome,
            stats: self.stats,
            pages_processed,
            dataset_size: self.dataset.len(),
        };

        tracing::info!(
            "Harvest finished in {:.2}s. Total records: {}. Session stats: {}",
            start.elapsed().as_secs_f64(),
            summary.dataset_size,
            summary.stats
        );

        summary
    }

    /// Outer retry loop around the fetch layer
    ///
    /// The fetch layer retries transport failures internally; this loop
    /// exists on top of it because a fetch can succeed transport-wise yet
    /// return an unusable (empty) body. Uses the same
    /// backoff-with-jitter policy between attempts.
    async fn fetch_with_retries(&mut self, url: &str, page: u32) -> Option<String> {
        let max = self.config.fetch.max_retries;
        for attempt in 1..=max {
            match self.fetcher.fetch(url).await {
                Ok(body) if !body.trim().is_empty() => return Some(body),
                Ok(_) => {
                    tracing::warn!(
                        "Page {} returned an empty body (attempt {}/{})",
                        page,
                        attempt,
                        max
                    );
                }
                Err(e) => {
                    tracing::warn!("Error on page {} (attempt {}/{}): {}", page, attempt, max, e);
                }
            }

            if attempt < max {
                let delay = backoff_delay(self.config.fetch.backoff_factor, attempt);
                tracing::warn!("Retrying page {} in {:.2}s", page, delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }
        None
    }

    /// Sleeps a pseudo-random duration drawn from the configured interval
    ///
    /// Deliberate throttling against the source, not a performance knob.
    async fn pause_between_pages(&self) {
        let min = self.config.site.page_delay_min_secs;
        let max = self.config.site.page_delay_max_secs;
        if max <= 0.0 {
            return;
        }

        let delay = rand::thread_rng().gen_range(min..=max);
        tracing::info!("Sleeping {:.2}s before next page...", delay);
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    }
}

/// Builds the URL for a page index; page 1 is the base URL itself
pub fn build_page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    if base_url.ends_with('/') {
        format!("{}page-{}/", base_url, page)
    } else {
        format!("{}/page-{}/", base_url, page)
    }
}

/// Keys a page's extracted records into the page's namespace
///
/// Duplicate identifiers within one page collapse here; the last
/// occurrence in page order wins.
fn key_by_listing(records: Vec<Record>, page: u32) -> BTreeMap<String, Record> {
    let mut map = BTreeMap::new();
    for record in records {
        map.insert(page_key(page, &record.listing_id), record);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(listing_id: &str, price: Option<u64>) -> Record {
        Record {
            listing_id: listing_id.to_string(),
            name: None,
            year: None,
            make: None,
            model: None,
            category: None,
            price_reference: price,
            mpg_combined: None,
            rating_expert: None,
            rating_consumer: None,
            description: None,
        }
    }

    #[test]
    fn test_build_page_url_first_page_is_base() {
        assert_eq!(
            build_page_url("https://example.com/cars/", 1),
            "https://example.com/cars/"
        );
    }

    #[test]
    fn test_build_page_url_later_pages() {
        assert_eq!(
            build_page_url("https://example.com/cars/", 3),
            "https://example.com/cars/page-3/"
        );
    }

    #[test]
    fn test_build_page_url_without_trailing_slash() {
        assert_eq!(
            build_page_url("https://example.com/cars", 2),
            "https://example.com/cars/page-2/"
        );
    }

    #[test]
    fn test_key_by_listing_scopes_to_page() {
        let map = key_by_listing(vec![record("/a", Some(1))], 4);
        assert!(map.contains_key("page_4_/a"));
    }

    #[test]
    fn test_key_by_listing_last_duplicate_wins() {
        let map = key_by_listing(vec![record("/a", Some(1)), record("/a", Some(2))], 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map["page_1_/a"].price_reference, Some(2));
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(RunOutcome::StoppedEmpty.is_natural_end());
        assert!(!RunOutcome::StoppedEmpty.is_blocked());
        assert!(RunOutcome::StoppedBlocked.is_blocked());
        assert!(!RunOutcome::StoppedFetchExhausted.is_natural_end());
    }
}

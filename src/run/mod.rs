//! Pagination control loop
//!
//! This module contains the per-page harvest cycle (fetch, extract,
//! reconcile, persist, delay), the stop-condition logic, and run-level
//! statistics.

mod controller;
mod stats;

pub use controller::{build_page_url, Harvester, RunOutcome, RunSummary};
pub use stats::RunStats;

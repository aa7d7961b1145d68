//! Cumulative dataset and its reconciliation
//!
//! The dataset maps composite keys (`page_<n>_<listing_id>`) to records
//! and represents the full state of the remote source across all pages
//! ever seen. Each page owns a disjoint key namespace; the reconciler uses
//! that scoping for removal detection.

mod reconcile;
mod store;

pub use reconcile::{reconcile, ReconcileOutcome};
pub use store::{DatasetStore, JsonFileStore, StoreError};

use crate::extract::Record;
use std::collections::BTreeMap;

/// Cumulative mapping of page-scoped keys to records
pub type Dataset = BTreeMap<String, Record>;

/// Builds the composite key for a record on a page
pub fn page_key(page: u32, listing_id: &str) -> String {
    format!("page_{}_{}", page, listing_id)
}

/// The key prefix owned by a page
pub fn page_prefix(page: u32) -> String {
    format!("page_{}_", page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_format() {
        assert_eq!(page_key(3, "/cars/acme/runner/"), "page_3_/cars/acme/runner/");
    }

    #[test]
    fn test_page_key_starts_with_prefix() {
        assert!(page_key(12, "/x").starts_with(&page_prefix(12)));
    }

    #[test]
    fn test_prefixes_are_disjoint() {
        // page 1's prefix must not match page 10's keys
        assert!(!page_key(10, "/x").starts_with(&page_prefix(1)));
    }
}

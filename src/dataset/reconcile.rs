//! Incremental reconciliation of page extractions into the dataset

use crate::dataset::{page_prefix, Dataset};
use crate::extract::Record;
use std::collections::BTreeMap;

/// Keys touched by one reconciliation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Merges one page's records into the dataset in place
///
/// For each page record: a missing key is inserted (added), an existing
/// key with a structurally different value is overwritten (updated), an
/// identical value is left alone. Afterwards, every key under this page's
/// prefix that the page no longer reports is deleted (removed): the
/// page's current record set is authoritative for its own namespace.
/// Keys belonging to other pages are never touched.
///
/// Reconciling the same records twice is a no-op the second time.
pub fn reconcile(
    dataset: &mut Dataset,
    page_records: &BTreeMap<String, Record>,
    page: u32,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    let prefix = page_prefix(page);
    let existing_page_keys: Vec<String> = dataset
        .keys()
        .filter(|key| key.starts_with(&prefix))
        .cloned()
        .collect();

    for (key, record) in page_records {
        match dataset.get(key) {
            Some(stored) if stored != record => {
                dataset.insert(key.clone(), record.clone());
                outcome.updated.push(key.clone());
            }
            Some(_) => {}
            None => {
                dataset.insert(key.clone(), record.clone());
                outcome.added.push(key.clone());
            }
        }
    }

    for key in existing_page_keys {
        if !page_records.contains_key(&key) {
            dataset.remove(&key);
            outcome.removed.push(key);
        }
    }

    outcome
}

//! Run-level statistics

use crate::dataset::ReconcileOutcome;
use std::fmt;

/// Counters accumulated across all pages of one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl RunStats {
    /// Folds one page's reconciliation outcome into the totals
    pub fn absorb(&mut self, outcome: &ReconcileOutcome) {
        self.added += outcome.added.len();
        self.updated += outcome.updated.len();
        self.removed += outcome.removed.len();
    }

    pub fn total_changes(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Added | {} Updated | {} Removed",
            self.added, self.updated, self.removed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_accumulates_across_pages() {
        let mut stats = RunStats::default();

        stats.absorb(&ReconcileOutcome {
            added: vec!["page_1_/a".to_string(), "page_1_/b".to_string()],
            updated: vec![],
            removed: vec!["page_1_/c".to_string()],
        });
        stats.absorb(&ReconcileOutcome {
            added: vec![],
            updated: vec!["page_2_/d".to_string()],
            removed: vec![],
        });

        assert_eq!(stats.added, 2);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.total_changes(), 4);
    }

    #[test]
    fn test_display_format() {
        let stats = RunStats {
            added: 12,
            updated: 3,
            removed: 1,
        };
        assert_eq!(stats.to_string(), "12 Added | 3 Updated | 1 Removed");
    }
}

//! Running totals of replacements per document type, for log output only.

use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;

/// Cumulative replacement counts keyed by document type, in the order types
/// were first seen. Shared between concurrently intercepted responses.
#[derive(Debug, Default)]
pub struct ReplacementTally {
    /// Document type → replacements so far.
    counts: Mutex<IndexMap<String, usize>>,
}

impl ReplacementTally {
    /// Add `count` replacements for `document_type`; returns the new total.
    pub fn record(&self, document_type: &str, count: usize) -> usize {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let total = counts.entry(document_type.to_owned()).or_default();
        *total = total.saturating_add(count);
        return *total;
    }

    /// Copy of the current totals.
    pub fn snapshot(&self) -> IndexMap<String, usize> {
        return self.counts.lock().unwrap_or_else(PoisonError::into_inner).clone();
    }
}

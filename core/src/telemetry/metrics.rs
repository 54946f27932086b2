use std::sync::Mutex;

use crate::prelude::SourceKind;

/// Counts source loads that resolved, split by outcome.
pub struct LoadMetrics {
    inner: Mutex<Counters>,
}

#[derive(Default)]
struct Counters {
    loaded: Vec<SourceKind>,
    failed: Vec<SourceKind>,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_loaded(&self, kind: SourceKind) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.loaded.push(kind);
        }
    }

    pub fn record_failed(&self, kind: SourceKind) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.failed.push(kind);
        }
    }

    /// `(loaded, failed)` counts.
    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(counters) = self.inner.lock() {
            (counters.loaded.len(), counters.failed.len())
        } else {
            (0, 0)
        }
    }

    /// Sources that have resolved either way.
    pub fn settled(&self) -> usize {
        let (loaded, failed) = self.snapshot();
        loaded + failed
    }

    pub fn failed_sources(&self) -> Vec<SourceKind> {
        self.inner
            .lock()
            .map(|counters| counters.failed.clone())
            .unwrap_or_default()
    }
}

impl Default for LoadMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoadMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (loaded, failed) = self.snapshot();
        f.debug_struct("LoadMetrics")
            .field("loaded", &loaded)
            .field("failed", &failed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_counts_each_outcome() {
        let metrics = LoadMetrics::new();
        metrics.record_loaded(SourceKind::MunicipalityBoundaries);
        metrics.record_loaded(SourceKind::UrbanUnitBoundaries);
        metrics.record_failed(SourceKind::Results);
        assert_eq!(metrics.snapshot(), (2, 1));
        assert_eq!(metrics.settled(), 3);
        assert_eq!(metrics.failed_sources(), vec![SourceKind::Results]);
    }
}

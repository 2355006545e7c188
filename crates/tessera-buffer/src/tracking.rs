//! Buffer pool counters: dirty-page high-water mark and refused admissions.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Point-in-time copy of [`PoolStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    pub peak_dirty_pages: usize,
    pub inserts: usize,
    pub refused: usize,
}

#[derive(Default)]
pub struct PoolStats {
    peak_dirty_pages: AtomicUsize,
    inserts: AtomicUsize,
    refused: AtomicUsize,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one staged insert with `dirty` pages now dirty.
    pub fn record_insert(&self, dirty: usize) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        let prev = self.peak_dirty_pages.fetch_max(dirty, Ordering::AcqRel);
        if dirty > prev {
            #[cfg(feature = "tracing")]
            tracing::trace!(dirty_pages = dirty, "buffer pool high-water mark");
        }
    }

    /// Count an insert turned away because the pool was full.
    pub fn record_refusal(&self) {
        self.refused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn peak_dirty_pages(&self) -> usize {
        self.peak_dirty_pages.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            peak_dirty_pages: self.peak_dirty_pages(),
            inserts: self.inserts.load(Ordering::Relaxed),
            refused: self.refused.load(Ordering::Relaxed),
        }
    }
}

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for ring activity.
///
/// Producer-side and consumer-side counters sit on separate cache lines so
/// that enabling metrics does not make producers and consumers share a line.
#[derive(Debug, Default)]
pub struct Metrics {
    inserted: CachePadded<AtomicU64>,
    overwritten: AtomicU64,
    retrieved: CachePadded<AtomicU64>,
    misses: AtomicU64,
    contended: AtomicU64,
    released_on_teardown: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_inserted(&self) {
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_overwritten(&self) {
        self.overwritten.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_retrieved(&self) {
        self.retrieved.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_contended(&self) {
        self.contended.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_released_on_teardown(&self, n: u64) {
        self.released_on_teardown.fetch_add(n, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserted: self.inserted.load(Ordering::Relaxed),
            overwritten: self.overwritten.load(Ordering::Relaxed),
            retrieved: self.retrieved.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            contended: self.contended.load(Ordering::Relaxed),
            released_on_teardown: self.released_on_teardown.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Items accepted by `insert`
    pub inserted: u64,
    /// Unconsumed items released because `insert` reused their slot
    pub overwritten: u64,
    /// Items handed out by `retrieve` / `try_retrieve`
    pub retrieved: u64,
    /// Retrieval calls that found the whole window empty
    pub misses: u64,
    /// Slots `try_retrieve` skipped because they were locked
    pub contended: u64,
    /// Items released when the ring was torn down
    pub released_on_teardown: u64,
}

impl MetricsSnapshot {
    /// Items currently owned by the ring, as far as the counters can tell.
    pub fn resident(&self) -> u64 {
        self.inserted
            .saturating_sub(self.overwritten)
            .saturating_sub(self.retrieved)
            .saturating_sub(self.released_on_teardown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_resident() {
        let m = Metrics::new();
        for _ in 0..10 {
            m.add_inserted();
        }
        m.add_overwritten();
        m.add_retrieved();
        m.add_retrieved();
        m.add_miss();

        let s = m.snapshot();
        assert_eq!(s.inserted, 10);
        assert_eq!(s.overwritten, 1);
        assert_eq!(s.retrieved, 2);
        assert_eq!(s.misses, 1);
        assert_eq!(s.resident(), 7);

        m.add_released_on_teardown(7);
        assert_eq!(m.snapshot().resident(), 0);
    }
}

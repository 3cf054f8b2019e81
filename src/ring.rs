use crate::config::{DEFAULT_CAPACITY, DEFAULT_WINDOW};
use crate::invariants::{
    debug_assert_admission_consistent, debug_assert_in_window, debug_assert_slot_index,
};
use crate::slot::Slot;
use crate::{Config, DropRelease, Metrics, MetricsSnapshot, Release, RingError};
use crossbeam_utils::CachePadded;
use spin::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

// =============================================================================
// SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Admission
//
// Producers take the admission lock only to draw the next sequence number.
// Inside the same critical section the number of issued sequences is
// published to `published` with Release, so consumers can read the newest
// sequence with a single Acquire load and never touch the admission lock.
//
// ## Slots
//
// Sequence `s` lives in slot `s % N`. Each slot is a spin-locked
// `Option<(u64, T)>` holding the occupant together with its sequence:
// - insert: lock, replace, unlock, then release the displaced occupant
// - retrieve: lock, take if fresh enough, unlock
// The release callback never runs under a lock.
//
// Two producers whose sequences alias the same slot race only on that slot's
// lock; whichever stores last wins and the other's item is released. This
// needs sequences at least N apart, which means the slot was stale anyway.
//
// ## Retrieval window
//
// `retrieve` loads `published` once and scans `newest, newest-1, ...` for at
// most H sequences, stopping at the first slot whose occupant was inserted at
// or after `newest - (H - 1)`.
//
// `published` moves before the producer reaches its slot, so a scan can find
// slot `s % N` still holding the unretrieved item from `s - N`. That occupant
// is older than the window; the scan skips it and the pending insert releases
// it. Slots may change state while the scan runs, so the result is the
// freshest in-window item the scan saw, not an atomic view across slots.
//
// =============================================================================

/// Issues sequence numbers under the admission lock.
#[derive(Debug, Default)]
struct WriteCursor {
    /// Last sequence handed out; `None` before the first insert.
    last: Option<u64>,
}

impl WriteCursor {
    /// Next sequence number.
    ///
    /// Saturates at `u64::MAX`: past 2^64 - 1 inserts every further insert
    /// reuses the last sequence instead of panicking or wrapping to 0.
    #[inline]
    fn advance(&mut self) -> u64 {
        let next = self.last.map_or(0, |last| last.saturating_add(1));
        self.last = Some(next);
        next
    }

    /// Number of sequences issued, saturating like [`advance`](Self::advance).
    #[inline]
    fn issued(&self) -> u64 {
        self.last.map_or(0, |last| last.saturating_add(1))
    }
}

/// Fixed-capacity, most-recent-wins ring for real-time threads.
///
/// Producers [`insert`](Self::insert) items; consumers
/// [`retrieve`](Self::retrieve) the freshest unconsumed item among the last
/// `H` sequences. Nothing ever blocks on a full ring: an insert that lands on
/// an unconsumed item hands that item to the release callback `R`.
///
/// # Type Parameters
///
/// - `T`: the item type, moved in and out by value
/// - `R`: the release callback, see [`Release`]
/// - `N`: number of slots (default 64)
/// - `H`: retrieval window, `1 <= H <= N` (default 4)
///
/// # Example
///
/// ```
/// use rtring::RtRing;
///
/// let ring: RtRing<u32> = RtRing::default();
/// for frame in 0..10 {
///     ring.insert(frame);
/// }
/// assert_eq!(ring.retrieve(), Some(9));
/// assert_eq!(ring.retrieve(), None);
/// ```
pub struct RtRing<
    T,
    R = DropRelease,
    const N: usize = DEFAULT_CAPACITY,
    const H: usize = DEFAULT_WINDOW,
> where
    R: Release<T>,
{
    // === PRODUCER HOT ===
    /// Serializes sequence assignment
    admission: CachePadded<Mutex<WriteCursor>>,

    // === SHARED ===
    /// Number of sequences issued; written under `admission`, read by consumers
    published: CachePadded<AtomicU64>,

    // === COLD STATE ===
    release: R,
    metrics: Metrics,
    config: Config,
    /// Set once the remaining items have been released
    torn_down: bool,

    // === DATA ===
    /// Fixed at construction; never resized.
    slots: Box<[Slot<T>]>,
}

impl<T, R, const N: usize, const H: usize> RtRing<T, R, N, H>
where
    R: Release<T>,
{
    /// Rejects impossible shapes at compile time.
    const SHAPE: () = {
        assert!(N > 0, "RtRing capacity must be > 0");
        assert!(H > 0, "RtRing retrieval window must be > 0");
        assert!(H <= N, "RtRing retrieval window must not exceed capacity");
    };

    /// Creates an empty ring that disposes of unconsumed items with `release`.
    pub fn new(release: R) -> Self {
        Self::with_config(release, Config::default())
    }

    /// Creates an empty ring with the given configuration.
    pub fn with_config(release: R, config: Config) -> Self {
        let () = Self::SHAPE;

        let slots: Box<[Slot<T>]> = (0..N).map(|_| Slot::new()).collect();

        debug!(
            capacity = N,
            window = H,
            metrics = config.enable_metrics,
            "created rt ring"
        );

        Self {
            admission: CachePadded::new(Mutex::new(WriteCursor::default())),
            published: CachePadded::new(AtomicU64::new(0)),
            release,
            metrics: Metrics::new(),
            config,
            torn_down: false,
            slots,
        }
    }

    // ---------------------------------------------------------------------
    // CONSTANTS & STATUS
    // ---------------------------------------------------------------------

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// How many of the most recent sequences `retrieve` examines.
    #[inline]
    pub const fn window(&self) -> usize {
        H
    }

    /// Sequence number of the newest admitted insert, `None` before the first.
    #[inline]
    pub fn last_sequence(&self) -> Option<u64> {
        self.published.load(Ordering::Acquire).checked_sub(1)
    }

    /// Total number of inserts admitted so far.
    #[inline]
    pub fn inserted(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    /// Number of slots currently holding an item.
    ///
    /// Each slot is inspected under its own lock, one at a time, so the
    /// count may be stale by the time it is returned.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn slot_for(&self, seq: u64) -> (usize, &Slot<T>) {
        let idx = (seq % N as u64) as usize;
        debug_assert_slot_index!(idx, self.slots.len());
        (idx, &self.slots[idx])
    }

    /// Sequences scanned by a retrieval, newest first.
    #[inline]
    fn window_from(newest: u64) -> impl Iterator<Item = u64> {
        (0..H as u64).map_while(move |back| newest.checked_sub(back))
    }

    /// Oldest sequence a retrieval may return.
    #[inline]
    fn window_floor(newest: u64) -> u64 {
        newest.saturating_sub(H as u64 - 1)
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Draws the next sequence number and publishes it.
    #[inline]
    fn admit(&self) -> u64 {
        let mut cursor = self.admission.lock();
        debug_assert_admission_consistent!(
            self.published.load(Ordering::Relaxed),
            cursor.issued()
        );
        let seq = cursor.advance();
        self.published.store(cursor.issued(), Ordering::Release);
        seq
    }

    /// Stores `item` as the newest entry.
    ///
    /// Always succeeds. If the target slot still holds an item nobody
    /// retrieved, that item is passed to the release callback on this
    /// thread after the slot lock has been dropped.
    pub fn insert(&self, item: T) {
        let seq = self.admit();
        let (idx, slot) = self.slot_for(seq);
        let displaced = slot.swap(seq, item);

        if self.config.enable_metrics {
            self.metrics.add_inserted();
        }

        if let Some(stale) = displaced {
            trace!(seq, slot = idx, "overwrote unconsumed item");
            if self.config.enable_metrics {
                self.metrics.add_overwritten();
            }
            self.release.release(stale);
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Takes the freshest unconsumed item within the retrieval window.
    ///
    /// Scans from the newest sequence backwards through at most `H`
    /// sequences and returns the first in-window item it finds. Slots after
    /// that are not touched, and an occupant older than the window is never
    /// returned even if it sits in a scanned slot. Returns `None` when the
    /// whole window is empty.
    pub fn retrieve(&self) -> Option<T> {
        if let Some(newest) = self.last_sequence() {
            let floor = Self::window_floor(newest);
            for seq in Self::window_from(newest) {
                debug_assert_in_window!(seq, newest, H);
                let (_, slot) = self.slot_for(seq);
                if let Some(item) = slot.take_since(floor) {
                    if self.config.enable_metrics {
                        self.metrics.add_retrieved();
                    }
                    return Some(item);
                }
            }
        }

        if self.config.enable_metrics {
            self.metrics.add_miss();
        }
        None
    }

    /// Non-spinning variant of [`retrieve`](Self::retrieve).
    ///
    /// Slots that are locked at the moment they are reached are skipped
    /// rather than waited on. Returns `Ok(Some(item))` on the first occupied
    /// slot, `Ok(None)` if every slot in the window was inspected and empty,
    /// and [`RingError::Contended`] if nothing was found but at least one
    /// slot could not be inspected.
    pub fn try_retrieve(&self) -> Result<Option<T>, RingError> {
        let mut skipped = None;

        if let Some(newest) = self.last_sequence() {
            let floor = Self::window_floor(newest);
            for seq in Self::window_from(newest) {
                debug_assert_in_window!(seq, newest, H);
                let (idx, slot) = self.slot_for(seq);
                match slot.try_take_since(floor) {
                    Some(Some(item)) => {
                        if self.config.enable_metrics {
                            self.metrics.add_retrieved();
                        }
                        return Ok(Some(item));
                    }
                    Some(None) => {}
                    None => {
                        trace!(seq, slot = idx, "skipped contended slot");
                        if self.config.enable_metrics {
                            self.metrics.add_contended();
                        }
                        skipped.get_or_insert(idx);
                    }
                }
            }
        }

        match skipped {
            Some(slot) => Err(RingError::Contended { slot }),
            None => {
                if self.config.enable_metrics {
                    self.metrics.add_miss();
                }
                Ok(None)
            }
        }
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Tears the ring down, releasing every item still in it.
    ///
    /// Returns how many items were released. Dropping the ring does the
    /// same thing; this form just reports the count.
    pub fn release_all(mut self) -> usize {
        self.release_remaining()
    }

    /// Walks every slot once and releases what is left. Later calls are no-ops.
    fn release_remaining(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;

        let mut released = 0;
        for slot in self.slots.iter_mut() {
            if let Some((_, item)) = slot.get_mut().take() {
                self.release.release(item);
                released += 1;
            }
        }

        if self.config.enable_metrics {
            self.metrics.add_released_on_teardown(released as u64);
        }
        debug!(
            released,
            inserted = self.published.load(Ordering::Relaxed),
            "released rt ring"
        );
        released
    }
}

impl<T, R, const N: usize, const H: usize> Drop for RtRing<T, R, N, H>
where
    R: Release<T>,
{
    fn drop(&mut self) {
        self.release_remaining();
    }
}

impl<T, const N: usize, const H: usize> Default for RtRing<T, DropRelease, N, H> {
    fn default() -> Self {
        Self::new(DropRelease)
    }
}

impl<T, R, const N: usize, const H: usize> fmt::Debug for RtRing<T, R, N, H>
where
    R: Release<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RtRing")
            .field("capacity", &N)
            .field("window", &H)
            .field("last_sequence", &self.last_sequence())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

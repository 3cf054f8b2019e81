//! Debug assertion macros for ring invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`); release builds
//! pay nothing for them.

// =============================================================================
// Published count mirrors the admission cursor
// =============================================================================

/// Assert that `published` agrees with the cursor before a new sequence is drawn.
///
/// **Invariant**: `published == issued` whenever the admission lock is free;
/// only `admit()` stores to `published`, and only while holding the lock.
///
/// Used in: `RtRing::admit()`
macro_rules! debug_assert_admission_consistent {
    ($published:expr, $issued:expr) => {
        debug_assert!(
            $published == $issued,
            "published count {} disagrees with admission cursor {}",
            $published,
            $issued
        )
    };
}

// =============================================================================
// Slot index stays inside the ring
// =============================================================================

/// Assert that a physical slot index is inside `0..capacity`.
///
/// Used in: `RtRing::slot_for()`
macro_rules! debug_assert_slot_index {
    ($idx:expr, $capacity:expr) => {
        debug_assert!(
            $idx < $capacity,
            "slot index {} out of bounds for capacity {}",
            $idx,
            $capacity
        )
    };
}

// =============================================================================
// Retrieval never looks further back than the window
// =============================================================================

/// Assert that a scanned sequence lies inside the retrieval window.
///
/// **Invariant**: `newest - window < seq <= newest`
///
/// Used in: `RtRing::retrieve()`, `RtRing::try_retrieve()`
macro_rules! debug_assert_in_window {
    ($seq:expr, $newest:expr, $window:expr) => {
        debug_assert!(
            $seq <= $newest && $newest - $seq < $window as u64,
            "sequence {} outside window of {} ending at {}",
            $seq,
            $window,
            $newest
        )
    };
}

pub(crate) use debug_assert_admission_consistent;
pub(crate) use debug_assert_in_window;
pub(crate) use debug_assert_slot_index;

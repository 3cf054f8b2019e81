//! Error types for ring operations.

use thiserror::Error;

/// Errors reported by the non-spinning ring operations.
///
/// The blocking operations never fail: `insert` always accepts and
/// `retrieve` reports an empty window as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// A slot inside the retrieval window was locked by another thread and
    /// no other slot in the window held an item.
    #[error("slot {slot} in the retrieval window is locked by another thread")]
    Contended {
        /// Physical index of the first slot that was skipped.
        slot: usize,
    },
}

impl RingError {
    /// Returns `true` if retrying soon may succeed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Contended { .. })
    }
}

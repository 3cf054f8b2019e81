use crossbeam_utils::CachePadded;
#[cfg(test)]
use spin::MutexGuard;
use spin::Mutex;

/// One physical cell of the ring.
///
/// Each slot carries its own spin lock, so producers and consumers touching
/// different slots never contend. Padding keeps neighbouring locks on
/// separate cache lines.
///
/// The occupant is stored with the sequence number it was inserted under.
/// Between a producer drawing sequence `s` and storing into slot `s % N`,
/// that slot may still hold the unretrieved item from `s - N`; consumers use
/// the stored sequence to tell the two apart.
pub(crate) struct Slot<T> {
    cell: CachePadded<Mutex<Option<(u64, T)>>>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: CachePadded::new(Mutex::new(None)),
        }
    }

    /// Stores `item` under `seq`, returning the previous occupant if any.
    ///
    /// The guard is dropped before returning; callers release the old
    /// occupant outside the lock.
    #[inline]
    pub(crate) fn swap(&self, seq: u64, item: T) -> Option<T> {
        self.cell
            .lock()
            .replace((seq, item))
            .map(|(_, displaced)| displaced)
    }

    /// Empties the slot if its occupant was inserted at or after `floor`.
    ///
    /// Older occupants stay put; the insert that reuses the slot releases them.
    #[inline]
    pub(crate) fn take_since(&self, floor: u64) -> Option<T> {
        take_fresh(&mut self.cell.lock(), floor)
    }

    /// Like [`take_since`](Self::take_since) but gives up instead of spinning.
    ///
    /// `None` means the slot was locked; `Some(None)` means it held nothing
    /// fresh enough.
    #[inline]
    pub(crate) fn try_take_since(&self, floor: u64) -> Option<Option<T>> {
        self.cell
            .try_lock()
            .map(|mut occupant| take_fresh(&mut occupant, floor))
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        self.cell.lock().is_some()
    }

    /// Holds the slot lock until the guard is dropped.
    #[cfg(test)]
    pub(crate) fn hold(&self) -> MutexGuard<'_, Option<(u64, T)>> {
        self.cell.lock()
    }

    /// Unsynchronized access for teardown.
    pub(crate) fn get_mut(&mut self) -> &mut Option<(u64, T)> {
        self.cell.get_mut()
    }
}

#[inline]
fn take_fresh<T>(occupant: &mut Option<(u64, T)>, floor: u64) -> Option<T> {
    if occupant.as_ref().is_some_and(|(seq, _)| *seq >= floor) {
        occupant.take().map(|(_, item)| item)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_state_machine() {
        let slot = Slot::new();
        assert!(!slot.is_occupied());

        // EMPTY -> OCCUPIED
        assert_eq!(slot.swap(0, 'a'), None);
        assert!(slot.is_occupied());

        // OCCUPIED -> OCCUPIED hands back the displaced occupant
        assert_eq!(slot.swap(8, 'b'), Some('a'));

        // OCCUPIED -> EMPTY
        assert_eq!(slot.take_since(0), Some('b'));
        assert_eq!(slot.take_since(0), None);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn test_take_since_leaves_older_occupant() {
        let slot = Slot::new();
        slot.swap(3, 30);

        assert_eq!(slot.take_since(4), None);
        assert!(slot.is_occupied());

        assert_eq!(slot.take_since(3), Some(30));
    }

    #[test]
    fn test_try_take_reports_contention() {
        let slot = Slot::new();
        slot.swap(0, 7);

        let held = slot.hold();
        assert!(slot.try_take_since(0).is_none());
        drop(held);

        assert_eq!(slot.try_take_since(1), Some(None));
        assert_eq!(slot.try_take_since(0), Some(Some(7)));
        assert_eq!(slot.try_take_since(0), Some(None));
    }
}

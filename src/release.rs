//! Destruction of items the ring owns but nobody retrieved.

/// Caller-supplied release logic.
///
/// Invoked by the ring when an unconsumed item is overwritten by `insert` or
/// is still present at teardown. It runs on whichever producer thread caused
/// the overwrite, never while a ring lock is held, and should return quickly.
///
/// Any `Fn(T) + Send + Sync` closure implements this trait.
pub trait Release<T> {
    /// Takes ownership of `item` and disposes of it.
    fn release(&self, item: T);
}

impl<T, F> Release<T> for F
where
    F: Fn(T),
{
    #[inline]
    fn release(&self, item: T) {
        self(item);
    }
}

/// Default release strategy: drop the item.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropRelease;

impl<T> Release<T> for DropRelease {
    #[inline]
    fn release(&self, item: T) {
        drop(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_release() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let release = move |v: usize| {
            s.fetch_add(v, Ordering::SeqCst);
        };
        release.release(3);
        release.release(4);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_drop_release_runs_destructor() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);

        struct DropTracker;
        impl Drop for DropTracker {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        DropRelease.release(DropTracker);
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
    }
}

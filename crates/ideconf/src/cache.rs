//! A lazily computed value that can be reset.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

/// Holds a value computed on first use and dropped by [`invalidate`].
///
/// Readers of an initialized value only take a read lock. Computation is
/// serialized, so each generation of the value is computed once even when
/// several threads ask for it at the same time.
///
/// Invalidation does not wait for readers: a thread that is already
/// computing still returns its result, but a value computed before an
/// invalidation is never stored.
///
/// [`invalidate`]: ClearableLazy::invalidate
#[derive(Debug)]
pub struct ClearableLazy<T> {
    slot: RwLock<Option<T>>,
    compute: Mutex<()>,
    generation: AtomicU64,
}

impl<T: Clone> ClearableLazy<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            compute: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// The current value, if one has been computed since the last reset.
    pub fn get(&self) -> Option<T> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current value, computing it with `compute` if needed.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get() {
            return value;
        }

        let _guard = self.compute.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.get() {
            return value;
        }

        let generation = self.generation.load(Ordering::Acquire);
        let value = compute();
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) == generation {
            *slot = Some(value.clone());
        }
        value
    }

    /// Drop the current value. The next read computes a new one.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *slot = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T: Clone> Default for ClearableLazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_computes_once_until_invalidated() {
        let lazy = ClearableLazy::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Arc::new(calls.load(Ordering::SeqCst))
        };

        let first = lazy.get_or_compute(compute);
        let second = lazy.get_or_compute(compute);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        lazy.invalidate();
        assert!(!lazy.is_initialized());
        let third = lazy.get_or_compute(compute);
        assert_eq!(*third, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidation_during_compute_is_not_lost() {
        let lazy = ClearableLazy::new();
        let value = lazy.get_or_compute(|| {
            lazy.invalidate();
            "stale"
        });
        assert_eq!(value, "stale");
        assert!(lazy.get().is_none());
        assert_eq!(lazy.get_or_compute(|| "fresh"), "fresh");
    }

    #[test]
    fn test_concurrent_readers_share_one_computation() {
        let lazy = Arc::new(ClearableLazy::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    lazy.get_or_compute(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Arc::new(42)
                    })
                })
            })
            .collect();

        let values: Vec<Arc<i32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
    }
}

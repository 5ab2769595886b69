/*!
 * Read-Copy-Update Cell
 * Publishes immutable versions of read-mostly state behind an atomic pointer
 */

use arc_swap::ArcSwap;
use std::sync::Arc;

/// RCU-protected value with lock-free reads
///
/// Readers take an `Arc` snapshot and keep using it even while a writer
/// publishes a newer version. Writers never mutate a published value: they
/// build the next version and swap the pointer.
///
/// # Example
///
/// ```
/// use multipass::core::RcuCell;
/// use std::collections::BTreeMap;
///
/// let worlds = RcuCell::new(BTreeMap::from([("world", 1)]));
/// let before = worlds.load();
///
/// worlds.update(|map| {
///     let mut next = map.clone();
///     next.insert("nether", 2);
///     next
/// });
///
/// assert_eq!(before.len(), 1);
/// assert_eq!(worlds.load().len(), 2);
/// ```
pub struct RcuCell<T> {
    inner: Arc<ArcSwap<T>>,
}

impl<T> RcuCell<T> {
    /// Create a cell holding the first version
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(value)),
        }
    }

    /// Current version
    #[inline(always)]
    pub fn load(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Publish a version derived from the current one
    ///
    /// The closure may run more than once if another writer publishes
    /// concurrently; it must not have side effects.
    #[inline]
    pub fn update<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        self.inner.rcu(|old| f(old));
    }

    /// Publish a version derived from the current one, returning a value
    /// computed alongside it
    ///
    /// Like [`RcuCell::update`] the closure may be retried; the returned
    /// value comes from the attempt that was published.
    pub fn try_update<F, R, E>(&self, mut f: F) -> Result<R, E>
    where
        F: FnMut(&T) -> Result<(T, R), E>,
    {
        loop {
            let current = self.inner.load_full();
            let (next, out) = f(&current)?;
            let previous = self.inner.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                return Ok(out);
            }
        }
    }
}

impl<T> Clone for RcuCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RcuCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RcuCell").field(&*self.load()).finish()
    }
}

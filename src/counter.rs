use core::fmt;

use crate::utils::*;

/// A signed counter shared between concurrent workers.
///
/// Every mutation is a single atomic add, so concurrent increments and
/// decrements are never lost. Arithmetic wraps around on overflow, following
/// two's-complement `i64` semantics.
///
/// ```rust
/// # use taskgroup::AtomicCounter;
/// let counter = AtomicCounter::default();
/// std::thread::scope(|s| {
///     s.spawn(|| (0..1000).for_each(|_| { counter.increment(); }));
///     s.spawn(|| (0..1000).for_each(|_| { counter.decrement(); }));
/// });
/// assert_eq!(counter.load(), 0);
/// ```
pub struct AtomicCounter(AtomicI64);

impl AtomicCounter {
    /// Creates a counter holding `initial`.
    #[inline]
    pub fn new(initial: i64) -> Self {
        Self(AtomicI64::new(initial))
    }

    /// Atomically adds `delta` and returns the resulting value.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskgroup::AtomicCounter;
    ///
    /// let counter = AtomicCounter::new(i64::MAX);
    /// assert_eq!(counter.add(-2), i64::MAX - 2);
    /// // Overflow wraps around.
    /// assert_eq!(counter.add(3), i64::MIN);
    /// ```
    #[inline]
    pub fn add(&self, delta: i64) -> i64 {
        self.0.fetch_add(delta, atomic::AcqRel).wrapping_add(delta)
    }

    /// Atomically subtracts `delta` and returns the resulting value.
    #[inline]
    pub fn sub(&self, delta: i64) -> i64 {
        self.0.fetch_sub(delta, atomic::AcqRel).wrapping_sub(delta)
    }

    /// Adds one and returns the resulting value.
    #[inline]
    pub fn increment(&self) -> i64 {
        self.add(1)
    }

    /// Subtracts one and returns the resulting value.
    #[inline]
    pub fn decrement(&self) -> i64 {
        self.sub(1)
    }

    /// Reads the current value.
    ///
    /// The value reflects every add that happened-before this call.
    #[inline]
    pub fn load(&self) -> i64 {
        self.0.load(atomic::Acquire)
    }

    /// Consumes the counter, returning the final value.
    #[inline]
    pub fn into_inner(self) -> i64 {
        self.load()
    }
}

impl Default for AtomicCounter {
    #[inline]
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<i64> for AtomicCounter {
    #[inline]
    fn from(initial: i64) -> Self {
        Self::new(initial)
    }
}

impl fmt::Debug for AtomicCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicCounter").field(&self.load()).finish()
    }
}

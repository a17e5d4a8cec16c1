use core::time::Duration;

use derive_more::Debug;

use crate::{error::WaitTimeoutError, state::GroupState, utils::Arc, wait::Wait};

/// A reusable group of outstanding tasks.
///
/// The owner registers work with [`add`](Self::add) or
/// [`token`](Self::token), hands [`GroupHandle`]s or [`TaskToken`]s to the
/// workers, and blocks in [`wait`](Self::wait) until every unit has been
/// signaled [`done`](Self::done). Once the count is back to zero the group
/// can be armed again for another round.
///
/// # Generations
///
/// Every time the count drops to zero the current generation ends and every
/// waiter of that generation is released. A wait that starts after the group
/// was re-armed is only released by the next zero-crossing.
///
/// Calling `add` while a waiter is about to observe the count reaching zero
/// is a logic error. The waiter then either returns with the old generation
/// or stays for the new one, depending on which side of the zero-crossing
/// the `add` lands. Re-arm only after `wait` has returned.
///
/// ```rust
/// # use taskgroup::TaskGroup;
/// let group = TaskGroup::new();
/// group.add(2);
/// for _ in 0..2 {
///     let handle = group.handle();
///     std::thread::spawn(move || {
///         // Long-running task
///         handle.done();
///     });
/// }
/// group.wait();
/// assert!(group.is_idle());
/// ```
#[must_use]
#[derive(Debug)]
pub struct TaskGroup(
    #[debug("count: {}, generation: {}", _0.count(), _0.generation())] Arc<GroupState>,
);

/// Clonable handle to a [`TaskGroup`], for workers.
///
/// Dropping a handle does not signal anything. Use [`TaskToken`] for that.
#[derive(Clone, Debug)]
pub struct GroupHandle(#[debug("count: {}", _0.count())] Arc<GroupState>);

/// One registered unit of work.
///
/// The unit is signaled done when the token is released or dropped, also
/// when the owning thread unwinds.
#[must_use]
#[derive(Debug)]
pub struct TaskToken(#[debug("count: {}", _0.count())] Arc<GroupState>);

impl TaskGroup {
    /// Creates an idle group.
    pub fn new() -> Self {
        Self(Arc::new(GroupState::new()))
    }

    /// Adds `delta` to the outstanding count.
    ///
    /// # Panics
    ///
    /// Panics with `negative wait count` if the count would drop below zero,
    /// leaving the count unchanged.
    ///
    /// ```should_panic
    /// # use taskgroup::TaskGroup;
    /// let group = TaskGroup::new();
    /// group.add(1);
    /// group.add(-2);
    /// ```
    #[inline]
    #[track_caller]
    pub fn add(&self, delta: isize) {
        self.0.add(delta);
    }

    /// Signals one unit of work as done.
    ///
    /// # Panics
    ///
    /// Panics if no work is outstanding.
    #[inline]
    #[track_caller]
    pub fn done(&self) {
        self.0.add(-1);
    }

    /// Blocks the current thread until the outstanding count is zero.
    ///
    /// Returns immediately if the group is idle.
    #[inline]
    pub fn wait(&self) {
        self.0.wait();
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use taskgroup::TaskGroup;
    ///
    /// let group = TaskGroup::new();
    /// let token = group.token();
    /// assert!(group.wait_timeout(Duration::from_millis(10)).is_err());
    ///
    /// token.release();
    /// assert!(group.wait_timeout(Duration::from_millis(10)).is_ok());
    /// ```
    #[inline]
    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), WaitTimeoutError> {
        self.0.wait_timeout(timeout)
    }

    /// Returns a future that resolves once the outstanding count is zero.
    ///
    /// The generation is fixed when the future is first polled, so a future
    /// polled during one round is not released by an earlier zero-crossing.
    ///
    /// ```rust
    /// # use taskgroup::TaskGroup;
    /// # futures_executor::block_on(async {
    /// let group = TaskGroup::new();
    /// let token = group.token();
    /// std::thread::spawn(move || {
    ///     // Long-running task
    ///     token.release();
    /// });
    /// group.wait_async().await;
    /// # });
    /// ```
    #[inline]
    pub fn wait_async(&self) -> Wait<'_> {
        Wait::new(&self.0)
    }

    /// Registers one unit of work and returns the token that completes it.
    #[inline]
    #[track_caller]
    pub fn token(&self) -> TaskToken {
        TaskToken::new(&self.0)
    }

    /// Returns a clonable handle for workers.
    #[inline]
    pub fn handle(&self) -> GroupHandle {
        GroupHandle(self.0.clone())
    }

    /// Snapshot of the outstanding count.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.count()
    }

    /// Number of completed rounds, wrapping on overflow.
    ///
    /// ```
    /// use taskgroup::TaskGroup;
    ///
    /// let group = TaskGroup::new();
    /// assert_eq!(group.generation(), 0);
    /// group.token().release();
    /// group.token().release();
    /// assert_eq!(group.generation(), 2);
    /// ```
    #[inline]
    pub fn generation(&self) -> u64 {
        self.0.generation()
    }

    /// Checks whether no work is outstanding.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.count() == 0
    }

    #[cfg(test)]
    pub(crate) fn waker_slots(&self) -> usize {
        self.0.waker_slots()
    }
}

impl Default for TaskGroup {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl GroupHandle {
    /// See [`TaskGroup::add`].
    #[inline]
    #[track_caller]
    pub fn add(&self, delta: isize) {
        self.0.add(delta);
    }

    /// See [`TaskGroup::done`].
    #[inline]
    #[track_caller]
    pub fn done(&self) {
        self.0.add(-1);
    }

    /// See [`TaskGroup::token`].
    #[inline]
    #[track_caller]
    pub fn token(&self) -> TaskToken {
        TaskToken::new(&self.0)
    }

    /// See [`TaskGroup::count`].
    #[inline]
    pub fn count(&self) -> usize {
        self.0.count()
    }
}

impl TaskToken {
    #[track_caller]
    fn new(state: &Arc<GroupState>) -> Self {
        state.add(1);
        Self(state.clone())
    }

    /// Consumes the token.
    ///
    /// This is equivalent to dropping the token.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for TaskToken {
    #[inline]
    fn drop(&mut self) {
        self.0.release();
    }
}

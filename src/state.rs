use core::{
    mem,
    task::{Context, Poll, Waker},
    time::Duration,
};
use std::time::Instant;

use derive_more::Display;

use crate::{error::WaitTimeoutError, utils::*};

/// Waiters of the current generation.
///
/// Only touched with the group lock held. The generation advances exactly
/// when the count crosses zero, so a `(count, generation)` pair read under
/// the lock is always consistent.
struct Waiters {
    generation: u64,
    wakers: Vec<Option<Waker>>,
    vacant: Vec<usize>,
}

/// Where an asynchronous waiter is registered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Registration {
    generation: u64,
    slot: Option<usize>,
}

#[derive(Debug, Display, Clone, Copy)]
enum UsageError {
    #[display("negative wait count: {count} {delta:+}")]
    Negative { count: isize, delta: isize },
    #[display("wait count overflow: {count} {delta:+}")]
    Overflow { count: isize, delta: isize },
}

#[cold]
#[track_caller]
fn usage_error(err: UsageError) -> ! {
    tracing::error!(%err, "task group misuse");
    panic!("{err}");
}

#[inline]
fn apply(count: isize, delta: isize) -> Result<isize, UsageError> {
    match count.checked_add(delta) {
        Some(next) if next < 0 => Err(UsageError::Negative { count, delta }),
        Some(next) => Ok(next),
        None => Err(UsageError::Overflow { count, delta }),
    }
}

pub(crate) struct GroupState {
    count: AtomicIsize,
    waiters: Mutex<Waiters>,
    cond: Condvar,
}

impl GroupState {
    pub fn new() -> Self {
        Self {
            count: AtomicIsize::new(0),
            waiters: Mutex::new(Waiters {
                generation: 0,
                wakers: Vec::new(),
                vacant: Vec::new(),
            }),
            cond: Condvar::new(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count.load(atomic::Acquire) as usize
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        lock(&self.waiters).generation
    }

    #[cfg(test)]
    pub fn waker_slots(&self) -> usize {
        lock(&self.waiters).wakers.len()
    }

    #[track_caller]
    pub fn add(&self, delta: isize) {
        if let Err(err) = self.try_add(delta) {
            usage_error(err);
        }
    }

    /// Signals one unit done from a destructor.
    ///
    /// Misuse is logged instead of raised while the thread is already
    /// unwinding.
    pub fn release(&self) {
        match self.try_add(-1) {
            Ok(()) => {}
            Err(err) if std::thread::panicking() => {
                tracing::error!(%err, "task group misuse while unwinding");
            }
            Err(err) => usage_error(err),
        }
    }

    fn try_add(&self, delta: isize) -> Result<(), UsageError> {
        if delta == 0 {
            return Ok(());
        }
        let mut count = self.count.load(atomic::Relaxed);
        loop {
            let next = apply(count, delta)?;
            if next == 0 {
                return self.finish_generation(delta);
            }
            match self.count.compare_exchange_weak(
                count,
                next,
                atomic::AcqRel,
                atomic::Relaxed,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => count = actual,
            }
        }
    }

    /// Applies a `delta` expected to bring the count to zero, advancing the
    /// generation if it does.
    fn finish_generation(&self, delta: isize) -> Result<(), UsageError> {
        let mut waiters = lock(&self.waiters);
        let mut count = self.count.load(atomic::Relaxed);
        loop {
            let next = apply(count, delta)?;
            match self.count.compare_exchange_weak(
                count,
                next,
                atomic::AcqRel,
                atomic::Relaxed,
            ) {
                Ok(_) if next == 0 => break,
                Ok(_) => return Ok(()),
                Err(actual) => count = actual,
            }
        }

        let generation = waiters.generation;
        waiters.generation = generation.wrapping_add(1);
        let wakers = mem::take(&mut waiters.wakers);
        waiters.vacant.clear();
        self.cond.notify_all();
        drop(waiters);

        tracing::trace!(generation, wakers = wakers.len(), "task group released");
        wakers.into_iter().flatten().for_each(Waker::wake);
        Ok(())
    }

    pub fn wait(&self) {
        if self.count.load(atomic::Acquire) == 0 {
            return;
        }
        let mut waiters = lock(&self.waiters);
        if self.count.load(atomic::Acquire) == 0 {
            return;
        }
        let generation = waiters.generation;
        while waiters.generation == generation {
            waiters = self
                .cond
                .wait(waiters)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), WaitTimeoutError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return Ok(());
        };
        if self.count.load(atomic::Acquire) == 0 {
            return Ok(());
        }
        let mut waiters = lock(&self.waiters);
        if self.count.load(atomic::Acquire) == 0 {
            return Ok(());
        }
        let generation = waiters.generation;
        while waiters.generation == generation {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!(generation, ?timeout, "task group wait timed out");
                return Err(WaitTimeoutError::new(timeout));
            }
            waiters = match self.cond.wait_timeout(waiters, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        Ok(())
    }

    /// Polls an asynchronous waiter.
    ///
    /// The generation is pinned at the first poll that finds work
    /// outstanding. Later polls only complete once that generation ends.
    pub fn poll_wait(
        &self,
        registration: &mut Option<Registration>,
        cx: &mut Context<'_>,
    ) -> Poll<()> {
        if registration.is_none() && self.count.load(atomic::Acquire) == 0 {
            return Poll::Ready(());
        }

        let mut waiters = lock(&self.waiters);
        if registration.is_none() && self.count.load(atomic::Acquire) == 0 {
            return Poll::Ready(());
        }
        let reg = registration.get_or_insert(Registration {
            generation: waiters.generation,
            slot: None,
        });

        if waiters.generation != reg.generation {
            reg.slot = None;
            return Poll::Ready(());
        }

        let waker = cx.waker();
        match reg.slot {
            Some(slot) => match &mut waiters.wakers[slot] {
                Some(old) if old.will_wake(waker) => {}
                entry => *entry = Some(waker.clone()),
            },
            None => match waiters.vacant.pop() {
                Some(slot) => {
                    waiters.wakers[slot] = Some(waker.clone());
                    reg.slot = Some(slot);
                }
                None => {
                    reg.slot = Some(waiters.wakers.len());
                    waiters.wakers.push(Some(waker.clone()));
                }
            },
        }
        Poll::Pending
    }

    /// Frees the slot of a waiter that will no longer be polled.
    pub fn unregister(&self, registration: Registration) {
        let Some(slot) = registration.slot else {
            return;
        };
        let waker = {
            let mut waiters = lock(&self.waiters);
            if waiters.generation != registration.generation {
                return;
            }
            let waker = waiters.wakers.get_mut(slot).and_then(Option::take);
            waiters.vacant.push(slot);
            waker
        };
        drop(waker);
    }
}

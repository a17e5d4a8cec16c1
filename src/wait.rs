use core::{
    pin::Pin,
    task::{Context, Poll},
};

use derive_more::Debug;

use crate::state::{GroupState, Registration};

/// Future returned by [`TaskGroup::wait_async`](crate::TaskGroup::wait_async).
///
/// # Cancellation safety
///
/// This future is cancellation safe.
///
/// It is also safe to poll again after completion.
///
/// ```rust
/// # use taskgroup::TaskGroup;
/// # futures_executor::block_on(async {
/// let group = TaskGroup::new();
/// let token = group.token();
/// let mut wait = core::pin::pin!(group.wait_async());
///
/// token.release();
///
/// wait.as_mut().await;
/// // It is safe to await again (re-poll)
/// wait.as_mut().await;
/// # });
/// ```
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[derive(Debug)]
pub struct Wait<'a> {
    #[debug("count: {}", state.count())]
    state: &'a GroupState,
    registration: Option<Registration>,
    done: bool,
}

impl<'a> Wait<'a> {
    #[inline]
    pub(crate) fn new(state: &'a GroupState) -> Self {
        Self {
            state,
            registration: None,
            done: false,
        }
    }
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(());
        }
        let poll = this.state.poll_wait(&mut this.registration, cx);
        if poll.is_ready() {
            this.done = true;
            this.registration = None;
        }
        poll
    }
}

impl Drop for Wait<'_> {
    #[inline]
    fn drop(&mut self) {
        if let Some(registration) = self.registration.take() {
            self.state.unregister(registration);
        }
    }
}

#[cfg(feature = "futures-core")]
impl futures_core::FusedFuture for Wait<'_> {
    #[inline]
    fn is_terminated(&self) -> bool {
        self.done
    }
}

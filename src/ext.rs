use core::{
    pin::Pin,
    task::{Context, Poll},
};

use derive_more::Debug;
use pin_project_lite::pin_project;

use crate::TaskToken;

pin_project! {
    /// Future returned by [`TokenFutureExt::release_on_ready`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    #[derive(Debug)]
    pub struct ReleaseOnReady<F> {
        #[pin]
        inner: F,
        token: Option<TaskToken>,
    }
}

impl<F> ReleaseOnReady<F> {
    /// Returns the token if the inner future has not completed yet.
    #[inline]
    pub fn token(&self) -> Option<&TaskToken> {
        self.token.as_ref()
    }

    /// Returns the inner future.
    #[inline]
    pub fn inner_pin(self: Pin<&mut Self>) -> Pin<&mut F> {
        self.project().inner
    }
}

pub trait TokenFutureExt: Future + Sized {
    /// Holds `token` until this future completes, then releases it.
    ///
    /// ```rust
    /// # use taskgroup::{TaskGroup, TokenFutureExt};
    /// # futures_executor::block_on(async {
    /// let group = TaskGroup::new();
    /// let job = async { 42 }.release_on_ready(group.token());
    /// assert_eq!(group.count(), 1);
    /// assert_eq!(job.await, 42);
    /// assert!(group.is_idle());
    /// # });
    /// ```
    fn release_on_ready(self, token: TaskToken) -> ReleaseOnReady<Self>;
}

impl<F: Future> TokenFutureExt for F {
    #[inline]
    fn release_on_ready(self, token: TaskToken) -> ReleaseOnReady<Self> {
        ReleaseOnReady {
            inner: self,
            token: Some(token),
        }
    }
}

impl<F: Future> Future for ReleaseOnReady<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let output = core::task::ready!(this.inner.poll(cx));
        drop(this.token.take());
        Poll::Ready(output)
    }
}

#[cfg(feature = "futures-core")]
impl<F: Future> futures_core::FusedFuture for ReleaseOnReady<F> {
    #[inline]
    fn is_terminated(&self) -> bool {
        self.token.is_none()
    }
}

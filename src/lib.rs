//! A reusable task group and an atomic counter for coordinating worker
//! threads.
//!
//! Register outstanding work on a [`TaskGroup`], let workers signal
//! completion, and block (or `.await`) until the count is back to zero. The
//! group can then be armed again for the next round.
//!
//! # Usage
//!
//! ## [`TaskGroup`] with [`AtomicCounter`]
//!
//! ```rust
//! # use std::sync::Arc;
//! # use taskgroup::{AtomicCounter, TaskGroup};
//! let counter = Arc::new(AtomicCounter::default());
//! let group = TaskGroup::new();
//! group.add(2);
//! for delta in [1, -1] {
//!     let (counter, handle) = (counter.clone(), group.handle());
//!     std::thread::spawn(move || {
//!         for _ in 0..1000 {
//!             counter.add(delta);
//!         }
//!         handle.done();
//!     });
//! }
//! group.wait();
//! assert_eq!(counter.load(), 0);
//! ```
//!
//! ## [`TaskToken`]
//!
//! ```rust
//! # use taskgroup::TaskGroup;
//! let group = TaskGroup::new();
//! for _ in 0..4 {
//!     let token = group.token();
//!     std::thread::spawn(move || {
//!         // Long-running task
//!         token.release();
//!     });
//! }
//! group.wait();
//!
//! // Reuse the group for another round
//! let token = group.token();
//! std::thread::spawn(move || drop(token));
//! group.wait();
//! ```
//!
//! # Misuse
//!
//! Signaling more units than were registered panics with
//! `negative wait count`. The count itself is never driven below zero.

mod counter;
mod error;
mod ext;
mod group;
mod state;
mod utils;
mod wait;

pub use crate::{
    counter::AtomicCounter,
    error::WaitTimeoutError,
    ext::{ReleaseOnReady, TokenFutureExt},
    group::{GroupHandle, TaskGroup, TaskToken},
    wait::Wait,
};

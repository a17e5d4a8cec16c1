//! One worker incrementing and one decrementing a shared counter.

use std::{sync::Arc, thread};

use taskgroup::{AtomicCounter, TaskGroup};
use tracing_subscriber::EnvFilter;

const ITERATIONS: usize = 1000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let counter = Arc::new(AtomicCounter::default());
    let group = TaskGroup::new();

    group.add(2);
    for delta in [1, -1] {
        let (counter, handle) = (counter.clone(), group.handle());
        thread::spawn(move || {
            for _ in 0..ITERATIONS {
                counter.add(delta);
            }
            handle.done();
        });
    }
    group.wait();

    tracing::info!(counter = counter.load(), "workers finished");
}

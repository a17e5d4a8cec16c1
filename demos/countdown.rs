//! Two workers finishing at different times, then a second round on the
//! same group.
//!
//! Run with `RUST_LOG=taskgroup=trace` to see the group being released.

use std::{thread, time::Duration};

use taskgroup::TaskGroup;
use tracing_subscriber::EnvFilter;

fn spawn_worker(group: &TaskGroup, id: usize, secs: u64) {
    let token = group.token();
    thread::spawn(move || {
        tracing::info!(id, "worker started");
        thread::sleep(Duration::from_secs(secs));
        tracing::info!(id, "worker completed");
        token.release();
    });
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let group = TaskGroup::new();

    spawn_worker(&group, 1, 1);
    spawn_worker(&group, 2, 2);
    group.wait();
    tracing::info!(generation = group.generation(), "2 workers completed");

    spawn_worker(&group, 3, 3);
    group.wait();
    tracing::info!(generation = group.generation(), "all workers completed");
}

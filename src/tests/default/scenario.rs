use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crate::{AtomicCounter, TaskGroup};

const UNIT: Duration = Duration::from_millis(20);

#[test]
fn test_counter_with_group() {
    let counter = Arc::new(AtomicCounter::default());
    let group = TaskGroup::new();
    group.add(2);

    for delta in [1, -1] {
        let (counter, handle) = (counter.clone(), group.handle());
        thread::spawn(move || {
            for _ in 0..1000 {
                counter.add(delta);
            }
            handle.done();
        });
    }

    group.wait();
    assert_eq!(counter.load(), 0);
}

#[test]
fn test_staggered_workers() {
    let finished = Arc::new(AtomicCounter::default());
    let group = TaskGroup::new();
    let start = Instant::now();

    group.add(2);
    for units in [1, 2] {
        let (finished, handle) = (finished.clone(), group.handle());
        thread::spawn(move || {
            thread::sleep(UNIT * units);
            finished.increment();
            handle.done();
        });
    }
    group.wait();
    assert!(start.elapsed() >= UNIT * 2);
    assert_eq!(finished.load(), 2);

    let start = Instant::now();
    group.add(1);
    let (finished_c, handle) = (finished.clone(), group.handle());
    thread::spawn(move || {
        thread::sleep(UNIT * 3);
        finished_c.increment();
        handle.done();
    });
    group.wait();
    assert!(start.elapsed() >= UNIT * 3);
    assert_eq!(finished.load(), 3);
    assert_eq!(group.generation(), 2);
}

#[test]
fn test_scoped_workers() {
    let counter = AtomicCounter::default();
    let group = TaskGroup::new();
    thread::scope(|s| {
        for _ in 0..4 {
            let token = group.token();
            let counter = &counter;
            s.spawn(move || {
                counter.increment();
                token.release();
            });
        }
        group.wait();
        assert_eq!(counter.load(), 4);
    });
}

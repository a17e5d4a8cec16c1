use crate::{
    AtomicCounter, TaskGroup,
    tests::utils::{Arc, SharedData, TESTING_THREADS, thread},
};

#[cfg_attr(not(loom), test)]
pub fn test_group_wait_idle() {
    let group = TaskGroup::new();
    group.wait();
    assert_eq!(group.generation(), 0);
}

#[cfg_attr(not(loom), test)]
pub fn test_group_wait_threads() {
    let counter = Arc::new(AtomicCounter::default());
    let group = TaskGroup::new();
    group.add(TESTING_THREADS as isize);
    for _ in 0..TESTING_THREADS {
        let (counter, handle) = (counter.clone(), group.handle());
        thread::spawn(move || {
            counter.increment();
            handle.done();
        });
    }
    group.wait();
    assert_eq!(counter.load(), TESTING_THREADS as i64);
    assert!(group.is_idle());
    assert_eq!(group.generation(), 1);
}

#[cfg_attr(not(loom), test)]
pub fn test_group_wait_tokens() {
    let canary = Arc::new(SharedData::new());
    let group = TaskGroup::new();
    let token = group.token();
    let inspector = canary.clone();
    thread::spawn(move || {
        canary.store();
        token.release();
    });
    group.wait();
    assert!(inspector.load());
}

#[cfg_attr(not(loom), test)]
pub fn test_group_reuse() {
    let counter = Arc::new(AtomicCounter::default());
    let group = TaskGroup::new();

    for round in 1..=2 {
        let token = group.token();
        let worker_counter = counter.clone();
        thread::spawn(move || {
            worker_counter.increment();
            drop(token);
        });
        group.wait();
        assert_eq!(counter.load(), round);
        assert_eq!(group.generation(), round as u64);
    }
}

#[cfg_attr(not(loom), test)]
pub fn test_group_wait_many_waiters() {
    let canary = Arc::new(SharedData::new());
    let group = Arc::new(TaskGroup::new());
    let token = group.token();

    let waiters = (0..2)
        .map(|_| {
            let (group, canary) = (group.clone(), canary.clone());
            thread::spawn(move || {
                group.wait();
                assert!(canary.load());
            })
        })
        .collect::<Vec<_>>();

    canary.store();
    token.release();
    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(group.generation(), 1);
}

#[cfg(not(loom))]
mod timeout {
    use std::time::{Duration, Instant};

    use crate::TaskGroup;

    #[test]
    fn test_group_wait_timeout_elapsed() {
        let group = TaskGroup::new();
        let _token = group.token();
        let start = Instant::now();
        let err = group.wait_timeout(Duration::from_millis(50)).unwrap_err();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(err.timeout(), Duration::from_millis(50));
        assert_eq!(err.to_string(), "task group wait timed out after 50ms");
        assert_eq!(group.count(), 1);
    }

    #[test]
    fn test_group_wait_timeout_completed() {
        let group = TaskGroup::new();
        let token = group.token();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            token.release();
        });
        assert_eq!(group.wait_timeout(Duration::from_secs(10)), Ok(()));
        assert!(group.is_idle());
    }

    #[test]
    fn test_group_wait_timeout_idle() {
        let group = TaskGroup::new();
        assert_eq!(group.wait_timeout(Duration::ZERO), Ok(()));
    }

    #[test]
    fn test_group_wait_timeout_unbounded() {
        let group = TaskGroup::new();
        let token = group.token();
        std::thread::spawn(move || token.release());
        assert_eq!(group.wait_timeout(Duration::MAX), Ok(()));
    }
}

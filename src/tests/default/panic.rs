use crate::TaskGroup;

#[cfg_attr(not(loom), test, should_panic(expected = "negative wait count"))]
pub fn test_group_panic_done_idle() {
    let group = TaskGroup::new();
    group.done();
}

#[cfg_attr(not(loom), test, should_panic(expected = "negative wait count"))]
pub fn test_group_panic_done_twice() {
    let group = TaskGroup::new();
    group.add(1);
    group.done();
    group.done();
}

#[cfg_attr(not(loom), test, should_panic(expected = "negative wait count"))]
pub fn test_group_panic_add_negative() {
    let group = TaskGroup::new();
    group.add(2);
    group.add(-3);
}

#[cfg_attr(not(loom), test, should_panic(expected = "negative wait count"))]
pub fn test_handle_panic_done() {
    let group = TaskGroup::new();
    let handle = group.handle();
    let _token = handle.token();
    handle.done();
    handle.done();
}

#[cfg_attr(not(loom), test, should_panic(expected = "wait count overflow"))]
pub fn test_group_panic_overflow() {
    let group = TaskGroup::new();
    group.add(isize::MAX);
    group.add(1);
}

#[cfg_attr(not(loom), test, should_panic)]
#[allow(unreachable_code)]
pub fn test_group_panic_with_token() {
    let group = TaskGroup::new();
    let _token = group.token();
    panic!();
    drop(_token);
}

//! A thread has at most one joiner; the second one is refused.

use std::sync::Mutex;
use sthread::{init, join, spawn, yield_now, Priority, SchedError};

static RESULTS: Mutex<Vec<(&'static str, Result<usize, SchedError>)>> = Mutex::new(Vec::new());

#[test]
fn second_joiner_is_refused() {
    init().unwrap();

    // Low priority so both joiners run (and register) before it exits
    let target = spawn(
        || {
            yield_now().unwrap();
            77
        },
        Priority::new(1),
    )
    .unwrap();

    let j1 = spawn(
        move || {
            RESULTS.lock().unwrap().push(("j1", join(target)));
            0
        },
        Priority::new(5),
    )
    .unwrap();
    let j2 = spawn(
        move || {
            RESULTS.lock().unwrap().push(("j2", join(target)));
            0
        },
        Priority::new(5),
    )
    .unwrap();

    join(j1).unwrap();
    join(j2).unwrap();

    let results = RESULTS.lock().unwrap().clone();
    // j1 registered first and collected the value; j2 was turned away
    // immediately, before the target ever exited
    assert_eq!(results[0], ("j2", Err(SchedError::AlreadyJoined)));
    assert_eq!(results[1], ("j1", Ok(77)));
}

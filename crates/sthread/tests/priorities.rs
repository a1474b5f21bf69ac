//! Priority dispatch end to end: three workers at 3/6/10 plus nice.

use std::sync::Mutex;
use sthread::{dump, init, join, nice, spawn, yield_now, Priority};

static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn record(tag: &'static str) {
    ORDER.lock().unwrap().push(tag);
}

#[test]
fn priority_dispatch_with_nice() {
    init().unwrap();

    let t3 = spawn(
        || {
            record("t3-a");
            // Raise ourselves above 6 but below 10; applies on requeue
            assert_eq!(nice(5).unwrap(), Priority::new(8));
            yield_now().unwrap();
            record("t3-b");
            // Round trip back to the original level
            assert_eq!(nice(-5).unwrap(), Priority::new(3));
            3
        },
        Priority::new(3),
    )
    .unwrap();
    let t6 = spawn(
        || {
            record("t6-a");
            yield_now().unwrap();
            record("t6-b");
            6
        },
        Priority::new(6),
    )
    .unwrap();
    let t10 = spawn(
        || {
            record("t10-a");
            yield_now().unwrap();
            record("t10-b");
            10
        },
        Priority::new(10),
    )
    .unwrap();

    record("m-start");
    yield_now().unwrap();
    record("m-end");

    // All three ran to completion while we were parked: nothing left
    // runnable or sleeping, three zombies holding their values
    let report = dump().unwrap();
    assert!(report.runnable.is_empty());
    assert!(report.sleeping.is_empty());
    assert_eq!(report.zombies.len(), 3);

    assert_eq!(join(t10).unwrap(), 10);
    assert_eq!(join(t6).unwrap(), 6);
    assert_eq!(join(t3).unwrap(), 3);

    let order = ORDER.lock().unwrap().clone();
    // Highest band runs to completion first; the bootstrap thread at
    // priority 0 resumes only after every worker is done
    assert_eq!(
        order,
        vec![
            "m-start", "t10-a", "t10-b", "t6-a", "t6-b", "t3-a", "t3-b", "m-end"
        ]
    );
}

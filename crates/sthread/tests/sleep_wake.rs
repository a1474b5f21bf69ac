//! Tick-driven sleep: exact wake ticks and wake ordering.

use std::sync::Mutex;
use sthread::{dump, init, join, sleep, spawn, Priority};

static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn record(tag: &'static str) {
    ORDER.lock().unwrap().push(tag);
}

#[test]
fn sleep_wakes_at_exact_tick() {
    init().unwrap();

    // Alone in the scheduler: the clock spins while we sleep, and we
    // wake at exactly now + ticks
    let before = dump().unwrap().clock;
    assert_eq!(before, 0);
    sleep(5).unwrap();
    assert_eq!(dump().unwrap().clock, 5);

    // Shorter deadline wakes first regardless of spawn order
    let s1 = spawn(
        || {
            sleep(4).unwrap();
            record("s1");
            0
        },
        Priority::new(5),
    )
    .unwrap();
    let s2 = spawn(
        || {
            sleep(2).unwrap();
            record("s2");
            0
        },
        Priority::new(5),
    )
    .unwrap();

    record("m1");
    sleep(10).unwrap();
    record("m2");

    join(s1).unwrap();
    join(s2).unwrap();

    let order = ORDER.lock().unwrap().clone();
    assert_eq!(order, vec!["m1", "s2", "s1", "m2"]);

    // Every dispatch decision is one tick: 5 (first sleep) + 10 more
    assert_eq!(dump().unwrap().clock, 15);

    // Non-positive counts degrade to a yield, never an error
    sleep(0).unwrap();
    sleep(-3).unwrap();
}

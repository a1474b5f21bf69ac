//! Spawn / join / exit lifecycle against a live scheduler.
//!
//! One test per file: the scheduler is process-global and every scenario
//! needs its own pristine instance.

use std::sync::atomic::{AtomicUsize, Ordering};
use sthread::{current_id, init, join, spawn, Priority, SchedError, ThreadId};

static RAN: AtomicUsize = AtomicUsize::new(0);

#[test]
fn basic_lifecycle() {
    let main_id = init().unwrap();
    assert_eq!(main_id, ThreadId::new(0));
    assert_eq!(current_id().unwrap(), main_id);

    // Joining yourself can never complete
    assert!(matches!(
        join(main_id),
        Err(SchedError::UsageViolation(_))
    ));

    let a = spawn(
        || {
            RAN.fetch_add(1, Ordering::Relaxed);
            11
        },
        Priority::new(5),
    )
    .unwrap();
    let b = spawn(
        || {
            RAN.fetch_add(1, Ordering::Relaxed);
            22
        },
        Priority::new(5),
    )
    .unwrap();
    assert_ne!(a, b);

    // Neither has run yet: spawn does not switch
    assert_eq!(RAN.load(Ordering::Relaxed), 0);

    // Join before exit: blocks until `a` runs and finishes. Both workers
    // outrank the bootstrap thread, so `b` also finishes before we
    // resume; the second join collects a stored value.
    assert_eq!(join(a).unwrap(), 11);
    assert_eq!(join(b).unwrap(), 22);
    assert_eq!(RAN.load(Ordering::Relaxed), 2);

    // Joined ids are reclaimed and stay dead
    assert_eq!(join(a), Err(SchedError::InvalidTarget));
    assert_eq!(join(ThreadId::new(999)), Err(SchedError::InvalidTarget));
}

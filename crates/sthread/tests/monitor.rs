//! Monitor enter/exit/wait/signal across a real producer/consumer hop.

use std::collections::VecDeque;
use std::sync::Mutex;
use sthread::{
    init_with_config, join, monitor_enter, monitor_exit, monitor_free, monitor_init,
    monitor_signal, monitor_wait, spawn, yield_now, Priority, SchedError, SchedulerConfig,
};

static QUEUE: Mutex<VecDeque<usize>> = Mutex::new(VecDeque::new());

#[test]
fn monitor_wait_signal() {
    let config = SchedulerConfig::new().main_priority(Priority::new(5));
    init_with_config(config).unwrap();

    let m = monitor_init().unwrap();

    // Signalling into the void is a no-op, not an error
    monitor_signal(m).unwrap();

    // Wait and exit both require holding the monitor
    assert!(matches!(
        monitor_wait(m),
        Err(SchedError::UsageViolation(_))
    ));
    assert!(matches!(
        monitor_exit(m),
        Err(SchedError::UsageViolation(_))
    ));

    monitor_enter(m).unwrap();
    assert!(matches!(
        monitor_enter(m),
        Err(SchedError::UsageViolation(_))
    ));
    monitor_exit(m).unwrap();

    let consumer = spawn(
        move || {
            monitor_enter(m).unwrap();
            while QUEUE.lock().unwrap().is_empty() {
                monitor_wait(m).unwrap();
            }
            let item = QUEUE.lock().unwrap().pop_front().unwrap();
            monitor_exit(m).unwrap();
            item
        },
        Priority::new(5),
    )
    .unwrap();

    // Consumer runs up to the wait and parks on the condition queue
    yield_now().unwrap();

    // Produce under the monitor, then signal. The signal wakes the
    // consumer but does not hand it exclusion; it re-enters on its own.
    monitor_enter(m).unwrap();
    QUEUE.lock().unwrap().push_back(42);
    monitor_signal(m).unwrap();
    monitor_exit(m).unwrap();

    assert_eq!(join(consumer).unwrap(), 42);

    monitor_free(m).unwrap();
    assert_eq!(monitor_enter(m), Err(SchedError::InvalidTarget));
}

//! Monitor producer/consumer example
//!
//! A bounded queue guarded by a monitor: consumers wait on the condition
//! queue until the producer signals that an item is available.

// cargo run -p sthread-monitor
use std::collections::VecDeque;
use std::sync::Mutex;
use sthread::{
    init, join, monitor_enter, monitor_exit, monitor_free, monitor_init, monitor_signal,
    monitor_wait, spawn, yield_now, Priority,
};

static QUEUE: Mutex<VecDeque<usize>> = Mutex::new(VecDeque::new());

fn main() {
    println!("=== sthread Monitor Example ===\n");
    init().expect("scheduler init");

    let mon = monitor_init().expect("monitor init");

    let mut consumers = Vec::new();
    for i in 1..=2 {
        let id = spawn(
            move || {
                monitor_enter(mon).expect("enter");
                while QUEUE.lock().unwrap().is_empty() {
                    println!("[consumer {}] queue empty, waiting", i);
                    monitor_wait(mon).expect("wait");
                }
                let item = QUEUE.lock().unwrap().pop_front().unwrap();
                println!("[consumer {}] got item {}", i, item);
                monitor_exit(mon).expect("exit");
                item
            },
            Priority::new(5),
        )
        .expect("spawn consumer");
        consumers.push(id);
    }

    // Let both consumers park on the condition queue
    yield_now().expect("yield");

    for item in [10, 20] {
        monitor_enter(mon).expect("enter");
        QUEUE.lock().unwrap().push_back(item);
        println!("[producer] queued item {}, signalling", item);
        monitor_signal(mon).expect("signal");
        monitor_exit(mon).expect("exit");
    }

    for id in consumers {
        let item = join(id).expect("join");
        println!("[producer] consumer {} finished with {}", id, item);
    }

    monitor_free(mon).expect("monitor free");
    println!("\n=== Example Complete ===");
}

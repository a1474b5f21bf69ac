//! Basic sthread example
//!
//! Spawns a few cooperative threads, lets them interleave with yields,
//! and collects their exit values with join.
//!
//! # Environment Variables
//!
//! - `STH_FLUSH_EPRINT=1` - Flush debug output immediately
//! - `STH_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `STH_DEBUG=1` - Per-dispatch scheduler tracing

// STH_LOG_LEVEL=debug STH_FLUSH_EPRINT=1 cargo run -p sthread-basic
use sthread::{init, join, kdebug, kinfo, spawn, yield_now, Priority};

fn main() {
    println!("=== sthread Basic Example ===\n");

    let main_id = init().expect("scheduler init");
    println!("bootstrap thread id = {}", main_id);

    kinfo!("Spawning threads...");

    let mut workers = Vec::new();
    for i in 1..=3 {
        let id = spawn(
            move || {
                kdebug!("[thread {}] started", i);
                for j in 0..3 {
                    println!("[thread {}] iteration {}", i, j);
                    yield_now().expect("yield");
                }
                kdebug!("[thread {}] finished", i);
                i * 100
            },
            Priority::new(5),
        )
        .expect("spawn");
        println!("spawned thread {} (id={})", i, id);
        workers.push(id);
    }

    for id in workers {
        let value = join(id).expect("join");
        println!("thread {} exited with {}", id, value);
    }

    println!("\n=== Example Complete ===");
}

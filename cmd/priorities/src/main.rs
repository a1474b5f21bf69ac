//! Priority scheduling example
//!
//! Three threads at priorities 3, 6 and 10: the highest always runs
//! first, one of them re-prioritizes itself with nice, and the sleeper
//! shows up in the dump with its wake tick.

// cargo run -p sthread-priorities
use sthread::{dump, init, join, nice, sleep, spawn, yield_now, Priority};

fn worker(name: &'static str, iterations: usize) -> usize {
    for i in 0..iterations {
        println!("[{}] iteration {}", name, i);
        yield_now().expect("yield");
    }
    iterations
}

fn main() {
    println!("=== sthread Priority Example ===\n");
    init().expect("scheduler init");

    let low = spawn(
        || {
            println!("[low] raising priority by 5");
            let new = nice(5).expect("nice");
            println!("[low] now at priority {}", new);
            worker("low", 2)
        },
        Priority::new(3),
    )
    .expect("spawn low");

    let mid = spawn(
        || {
            println!("[mid] sleeping 5 ticks");
            sleep(5).expect("sleep");
            worker("mid", 2)
        },
        Priority::new(6),
    )
    .expect("spawn mid");

    let high = spawn(|| worker("high", 2), Priority::new(10)).expect("spawn high");

    // Let the workers run; the mid thread is asleep when we come back
    yield_now().expect("yield");
    print!("{}", dump().expect("dump"));

    for (name, id) in [("high", high), ("mid", mid), ("low", low)] {
        let value = join(id).expect("join");
        println!("[{}] exited with {}", name, value);
    }

    println!("\n=== Example Complete ===");
}

//! # sthread-runtime
//!
//! The user-level cooperative scheduler behind the `sthread` public surface.
//!
//! This crate provides:
//! - Stack management (mmap with a guard page per thread)
//! - Context switching (architecture-specific naked assembly)
//! - The TCB table and ready/sleep/zombie queue discipline
//! - The scheduler core (dispatch, logical clock, join/exit, nice, dump)
//! - Mutex and monitor primitives built on the scheduler's block/wake

pub mod arch;
pub mod clock;
pub mod config;
pub mod ready_queue;
pub mod scheduler;
pub mod sleep_queue;
pub mod stack;
pub mod sync;
pub mod tcb;

// Re-exports
pub use config::SchedulerConfig;
pub use scheduler::Scheduler;

// Architecture detection
cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub use arch::x86_64 as current_arch;
    } else if #[cfg(target_arch = "aarch64")] {
        pub use arch::aarch64 as current_arch;
    } else {
        compile_error!("Unsupported architecture");
    }
}

//! # sthread-core
//!
//! Core types for the sthread cooperative thread runtime.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Stack management and context switching live in `sthread-runtime`.
//!
//! ## Modules
//!
//! - `id` - Thread and sync-primitive handle types
//! - `state` - Thread state machine and priority type
//! - `dump` - Structured scheduler diagnostic report
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod dump;
pub mod env;
pub mod error;
pub mod id;
pub mod kprint;
pub mod state;

// Re-exports for convenience
pub use dump::{DumpEntry, DumpReport};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
pub use error::{SchedError, SchedResult};
pub use id::{MonitorHandle, MutexHandle, ThreadId};
pub use state::{Priority, ThreadState};

/// Shared constants
pub mod constants {
    /// Default maximum number of live threads
    pub const DEFAULT_MAX_THREADS: usize = 4096;

    /// Default per-thread stack size (excluding the guard page)
    pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;
}

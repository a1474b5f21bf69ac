//! Scheduler configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Environment variables (runtime)
//! 2. Builder methods
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use sthread_runtime::config::SchedulerConfig;
//!
//! // Use defaults with env overrides
//! let config = SchedulerConfig::from_env();
//!
//! // Or customize programmatically
//! let config = SchedulerConfig::new()
//!     .max_threads(256)
//!     .stack_size(128 * 1024);
//! ```

use sthread_core::env::{env_get, env_get_bool};
use sthread_core::error::{SchedError, SchedResult};
use sthread_core::state::Priority;

/// Compile-time defaults
pub mod defaults {
    use sthread_core::constants;

    /// Usable stack bytes per thread
    pub const STACK_SIZE: usize = constants::DEFAULT_STACK_SIZE;
    /// Maximum simultaneously live threads
    pub const MAX_THREADS: usize = constants::DEFAULT_MAX_THREADS;
    /// Priority the bootstrap thread runs at
    pub const MAIN_PRIORITY: u8 = 0;
    /// Per-dispatch tracing; on by default only with the
    /// `debug-logging` feature
    pub const DEBUG_LOGGING: bool = cfg!(feature = "debug-logging");
}

/// Scheduler configuration with builder pattern.
///
/// Use `from_env()` to start with compile-time defaults and apply
/// any environment variable overrides.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Usable stack size per thread
    pub stack_size: usize,
    /// Maximum simultaneously live threads
    pub max_threads: usize,
    /// Priority assigned to the bootstrap thread
    pub main_priority: Priority,
    /// Enable per-dispatch debug logging
    pub debug_logging: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SchedulerConfig {
    /// Create config from compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `STH_STACK_SIZE` - Usable stack bytes per thread
    /// - `STH_MAX_THREADS` - Max simultaneously live threads
    /// - `STH_MAIN_PRIORITY` - Bootstrap thread priority (0-31)
    /// - `STH_DEBUG` - Enable debug logging (0/1)
    pub fn from_env() -> Self {
        Self {
            stack_size: env_get("STH_STACK_SIZE", defaults::STACK_SIZE),
            max_threads: env_get("STH_MAX_THREADS", defaults::MAX_THREADS),
            main_priority: Priority::new(env_get("STH_MAIN_PRIORITY", defaults::MAIN_PRIORITY)),
            debug_logging: env_get_bool("STH_DEBUG", defaults::DEBUG_LOGGING),
        }
    }

    /// Create config with explicit defaults (no env override).
    /// Useful for testing or when you want full control.
    pub fn new() -> Self {
        Self {
            stack_size: defaults::STACK_SIZE,
            max_threads: defaults::MAX_THREADS,
            main_priority: Priority::new(defaults::MAIN_PRIORITY),
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    // Builder methods

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = n;
        self
    }

    pub fn main_priority(mut self, priority: Priority) -> Self {
        self.main_priority = priority;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> SchedResult<()> {
        if self.max_threads == 0 {
            return Err(SchedError::InvalidConfig("max_threads must be > 0"));
        }
        if self.max_threads > u32::MAX as usize {
            return Err(SchedError::InvalidConfig("max_threads must fit in u32"));
        }
        if self.stack_size < 4096 {
            return Err(SchedError::InvalidConfig("stack_size must be >= 4KB"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("sthread configuration:");
        eprintln!("  stack_size:     {}", self.stack_size);
        eprintln!("  max_threads:    {}", self.max_threads);
        eprintln!("  main_priority:  {}", self.main_priority.level());
        eprintln!("  debug_logging:  {}", self.debug_logging);
    }
}

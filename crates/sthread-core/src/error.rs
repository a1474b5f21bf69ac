//! Error types for the sthread scheduler

use core::fmt;

/// Result type for scheduler operations
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors that can occur in scheduler operations
///
/// Usage violations and invalid targets are reported synchronously to the
/// offending call and never swallowed; swallowing them would corrupt
/// scheduler invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// TCB or stack allocation could not be satisfied
    ResourceExhausted,

    /// Operation named a thread or handle that does not exist (or was
    /// already reclaimed/freed)
    InvalidTarget,

    /// Another thread is already registered as the target's joiner
    AlreadyJoined,

    /// API misuse: unlock by non-owner, wait outside a held monitor,
    /// relocking a held mutex, self-join, freeing a busy primitive
    UsageViolation(&'static str),

    /// A blocking call would leave no runnable and no sleeping thread:
    /// the caller would never be woken
    Starvation,

    /// Scheduler not initialized
    NotInitialized,

    /// Scheduler already initialized
    AlreadyInitialized,

    /// Invalid scheduler configuration
    InvalidConfig(&'static str),
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::ResourceExhausted => write!(f, "thread resources exhausted"),
            SchedError::InvalidTarget => write!(f, "unknown thread or handle"),
            SchedError::AlreadyJoined => write!(f, "thread already has a joiner"),
            SchedError::UsageViolation(msg) => write!(f, "usage violation: {}", msg),
            SchedError::Starvation => write!(f, "no runnable or sleeping thread remains"),
            SchedError::NotInitialized => write!(f, "scheduler not initialized"),
            SchedError::AlreadyInitialized => write!(f, "scheduler already initialized"),
            SchedError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for SchedError {}

//! Thread state machine and priority type

use core::fmt;

/// State of a logical thread
///
/// A thread belongs to exactly one of the scheduler's containers at a time:
/// the ready queue (`Ready`), the sleep queue (`Sleeping`), a wait set
/// (`Blocked`), the zombie list (`Zombie`), or it is the single `Running`
/// thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    /// Just created, not yet enqueued
    Created = 0,

    /// Ready to run, in the ready queue
    Ready = 1,

    /// Currently executing (at most one thread at any instant)
    Running = 2,

    /// Sleeping until its wake tick
    Sleeping = 3,

    /// Blocked on join, mutex, or monitor
    Blocked = 4,

    /// Exited, holding its exit value until joined
    Zombie = 5,
}

impl ThreadState {
    /// Check if this state allows the thread to be dispatched
    #[inline]
    pub const fn is_runnable(&self) -> bool {
        matches!(self, ThreadState::Ready)
    }

    /// Check if the thread has exited (zombies are never scheduled again)
    #[inline]
    pub const fn is_zombie(&self) -> bool {
        matches!(self, ThreadState::Zombie)
    }
}

impl From<u8> for ThreadState {
    fn from(v: u8) -> Self {
        match v {
            0 => ThreadState::Created,
            1 => ThreadState::Ready,
            2 => ThreadState::Running,
            3 => ThreadState::Sleeping,
            4 => ThreadState::Blocked,
            5 => ThreadState::Zombie,
            _ => ThreadState::Created, // Default for invalid values
        }
    }
}

impl From<ThreadState> for u8 {
    fn from(state: ThreadState) -> u8 {
        state as u8
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadState::Created => write!(f, "created"),
            ThreadState::Ready => write!(f, "ready"),
            ThreadState::Running => write!(f, "running"),
            ThreadState::Sleeping => write!(f, "sleeping"),
            ThreadState::Blocked => write!(f, "blocked"),
            ThreadState::Zombie => write!(f, "zombie"),
        }
    }
}

/// Dispatch priority of a thread
///
/// Numeric, totally ordered: a higher value means higher dispatch priority.
/// Valid range is `MIN..=MAX`; constructors and `nice` adjustments clamp
/// into it. Within one priority level the scheduler is FIFO, so equal-
/// priority threads run in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Priority(u8);

impl Priority {
    /// Lowest dispatch priority
    pub const MIN: Priority = Priority(0);

    /// Highest dispatch priority
    pub const MAX: Priority = Priority(31);

    /// Number of priority levels
    pub const LEVELS: usize = 32;

    /// Create a priority, clamping into the valid range
    #[inline]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Priority(level)
        }
    }

    /// Get the raw level
    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Get the level as an index into per-priority structures
    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Apply a signed adjustment, saturating at the range bounds
    ///
    /// This is the `nice` primitive: a positive delta raises dispatch
    /// precedence, a negative one lowers it.
    #[inline]
    pub fn adjusted(self, delta: i32) -> Priority {
        let level = (self.0 as i32).saturating_add(delta);
        Priority(level.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u8)
    }
}

impl Default for Priority {
    fn default() -> Self {
        // Middle of the range, leaving headroom both ways for nice()
        Priority(15)
    }
}

impl From<u8> for Priority {
    fn from(v: u8) -> Self {
        Priority::new(v)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(ThreadState::Ready.is_runnable());
        assert!(!ThreadState::Running.is_runnable());
        assert!(!ThreadState::Blocked.is_runnable());
        assert!(!ThreadState::Sleeping.is_runnable());

        assert!(ThreadState::Zombie.is_zombie());
        assert!(!ThreadState::Running.is_zombie());
    }

    #[test]
    fn test_state_round_trip() {
        for raw in 0u8..=5 {
            let state = ThreadState::from(raw);
            assert_eq!(u8::from(state), raw);
        }
        // Out-of-range values fall back to Created
        assert_eq!(ThreadState::from(99), ThreadState::Created);
    }

    #[test]
    fn test_priority_ordering() {
        // Higher value = higher dispatch priority
        assert!(Priority::new(10) > Priority::new(6));
        assert!(Priority::new(6) > Priority::new(3));
        assert!(Priority::MIN < Priority::MAX);
    }

    #[test]
    fn test_priority_clamp() {
        assert_eq!(Priority::new(200), Priority::MAX);
        assert_eq!(Priority::new(31), Priority::MAX);
        assert_eq!(Priority::new(0), Priority::MIN);
    }

    #[test]
    fn test_priority_adjusted() {
        let p = Priority::new(10);
        assert_eq!(p.adjusted(5), Priority::new(15));
        assert_eq!(p.adjusted(-5), Priority::new(5));
        assert_eq!(p.adjusted(100), Priority::MAX);
        assert_eq!(p.adjusted(-100), Priority::MIN);
        // Round-trip returns to the original level
        assert_eq!(p.adjusted(5).adjusted(-5), p);
    }
}

//! Identifier types for threads and synchronization primitives

use core::fmt;

/// Unique identifier for a logical thread
///
/// Ids are assigned monotonically and never recycled, so a stale id can be
/// detected (`InvalidTarget`) instead of silently naming a new thread.
/// The maximum value (u32::MAX) is reserved as a sentinel for "no thread".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Sentinel value indicating no thread
    pub const NONE: ThreadId = ThreadId(u32::MAX);

    /// Create a new ThreadId from a raw value
    #[inline]
    pub const fn new(id: u32) -> Self {
        ThreadId(id)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Get as usize for indexing
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the NONE sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this is a valid thread id
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl From<u32> for ThreadId {
    #[inline]
    fn from(id: u32) -> Self {
        ThreadId(id)
    }
}

impl From<ThreadId> for u32 {
    #[inline]
    fn from(id: ThreadId) -> Self {
        id.0
    }
}

impl fmt::Debug for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "ThreadId(NONE)")
        } else {
            write!(f, "ThreadId({})", self.0)
        }
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        ThreadId::NONE
    }
}

/// Handle to a scheduler-managed mutex
///
/// Handles index the scheduler's mutex table. A freed handle is tombstoned;
/// using it afterwards reports `InvalidTarget`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MutexHandle(u32);

impl MutexHandle {
    #[inline]
    pub const fn new(id: u32) -> Self {
        MutexHandle(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MutexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MutexHandle({})", self.0)
    }
}

/// Handle to a scheduler-managed monitor
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MonitorHandle(u32);

impl MonitorHandle {
    #[inline]
    pub const fn new(id: u32) -> Self {
        MonitorHandle(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonitorHandle({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_basics() {
        let id = ThreadId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.as_usize(), 42);
        assert!(!id.is_none());
        assert!(id.is_some());
    }

    #[test]
    fn test_thread_id_none() {
        let none = ThreadId::NONE;
        assert!(none.is_none());
        assert!(!none.is_some());
        assert_eq!(format!("{}", none), "none");
    }

    #[test]
    fn test_thread_id_conversions() {
        let id: ThreadId = 100u32.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 100);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(format!("{:?}", MutexHandle::new(3)), "MutexHandle(3)");
        assert_eq!(format!("{:?}", MonitorHandle::new(7)), "MonitorHandle(7)");
    }
}

//! Mutex and monitor state machines
//!
//! The structures here are pure bookkeeping: ownership, FIFO wait queues,
//! and the hand-off decisions. Blocking itself (moving the caller off the
//! CPU and dispatching someone else) is the scheduler's job; these methods
//! only tell it who must wait and who gets ownership next.
//!
//! Hand-off policy: release transfers ownership directly to the first FIFO
//! waiter. The woken thread resumes already owning the primitive, so no
//! third party can observe it free in between.

use sthread_core::error::{SchedError, SchedResult};
use sthread_core::id::ThreadId;
use std::collections::VecDeque;

/// Table of scheduler-managed primitives, indexed by handle
///
/// Handles are assigned monotonically; a freed slot is tombstoned so a
/// stale handle reports `InvalidTarget` instead of aliasing a new
/// primitive.
pub struct HandleTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, value: T) -> u32 {
        let handle = self.slots.len() as u32;
        self.slots.push(Some(value));
        handle
    }

    pub fn get(&self, handle: u32) -> SchedResult<&T> {
        self.slots
            .get(handle as usize)
            .and_then(|s| s.as_ref())
            .ok_or(SchedError::InvalidTarget)
    }

    pub fn get_mut(&mut self, handle: u32) -> SchedResult<&mut T> {
        self.slots
            .get_mut(handle as usize)
            .and_then(|s| s.as_mut())
            .ok_or(SchedError::InvalidTarget)
    }

    /// Tombstone a slot, returning its value
    pub fn remove(&mut self, handle: u32) -> SchedResult<T> {
        self.slots
            .get_mut(handle as usize)
            .and_then(|s| s.take())
            .ok_or(SchedError::InvalidTarget)
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-reentrant mutex with a FIFO wait queue
pub struct MutexState {
    owner: Option<ThreadId>,
    waiters: VecDeque<ThreadId>,
}

impl MutexState {
    pub fn new() -> Self {
        Self {
            owner: None,
            waiters: VecDeque::new(),
        }
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    /// Attempt to take the lock for `who`
    ///
    /// Returns `true` when acquired, `false` when the caller must wait
    /// (the caller is NOT enqueued yet). Relocking a held mutex is a
    /// usage violation, not a deadlock.
    pub fn acquire_or_wait(&mut self, who: ThreadId) -> SchedResult<bool> {
        match self.owner {
            None => {
                self.owner = Some(who);
                Ok(true)
            }
            Some(owner) if owner == who => {
                Err(SchedError::UsageViolation("mutex is not reentrant"))
            }
            Some(_) => Ok(false),
        }
    }

    /// Enqueue a thread that `acquire_or_wait` told to wait
    pub fn push_waiter(&mut self, who: ThreadId) {
        self.waiters.push_back(who);
    }

    /// Release the lock, handing ownership to the first waiter
    ///
    /// Returns the handed-off thread, which must be made ready by the
    /// caller; `None` when the lock is simply free again.
    pub fn release(&mut self, who: ThreadId) -> SchedResult<Option<ThreadId>> {
        if self.owner != Some(who) {
            return Err(SchedError::UsageViolation("unlock by non-owner"));
        }
        self.owner = self.waiters.pop_front();
        Ok(self.owner)
    }

    /// A primitive may only be freed when idle
    pub fn ensure_idle(&self) -> SchedResult<()> {
        if self.owner.is_some() || !self.waiters.is_empty() {
            return Err(SchedError::UsageViolation("freeing a busy mutex"));
        }
        Ok(())
    }
}

impl Default for MutexState {
    fn default() -> Self {
        Self::new()
    }
}

/// A monitor: mutual exclusion plus one condition queue
pub struct MonitorState {
    owner: Option<ThreadId>,
    enter_waiters: VecDeque<ThreadId>,
    cond_waiters: VecDeque<ThreadId>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            owner: None,
            enter_waiters: VecDeque::new(),
            cond_waiters: VecDeque::new(),
        }
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    pub fn has_enter_waiters(&self) -> bool {
        !self.enter_waiters.is_empty()
    }

    /// Attempt to enter the monitor; semantics mirror `MutexState::acquire_or_wait`
    pub fn enter_or_wait(&mut self, who: ThreadId) -> SchedResult<bool> {
        match self.owner {
            None => {
                self.owner = Some(who);
                Ok(true)
            }
            Some(owner) if owner == who => {
                Err(SchedError::UsageViolation("monitor is not reentrant"))
            }
            Some(_) => Ok(false),
        }
    }

    pub fn push_enter_waiter(&mut self, who: ThreadId) {
        self.enter_waiters.push_back(who);
    }

    /// Leave the monitor, handing exclusion to the first enter-waiter
    pub fn exit(&mut self, who: ThreadId) -> SchedResult<Option<ThreadId>> {
        if self.owner != Some(who) {
            return Err(SchedError::UsageViolation("exit by non-owner"));
        }
        self.owner = self.enter_waiters.pop_front();
        Ok(self.owner)
    }

    /// Release exclusion and move `who` onto the condition queue
    ///
    /// Both steps happen in one transition, so there is no window in which
    /// a signal can be lost. Returns the enter-waiter that exclusion was
    /// handed to, if any.
    pub fn begin_wait(&mut self, who: ThreadId) -> SchedResult<Option<ThreadId>> {
        if self.owner != Some(who) {
            return Err(SchedError::UsageViolation("wait outside a held monitor"));
        }
        self.owner = self.enter_waiters.pop_front();
        self.cond_waiters.push_back(who);
        Ok(self.owner)
    }

    /// Wake exactly one condition waiter
    ///
    /// The woken thread does not receive exclusion; it re-competes for
    /// entry like any other enterer. Ownership is not required to signal,
    /// and signalling with no waiters is a no-op.
    pub fn signal(&mut self) -> Option<ThreadId> {
        self.cond_waiters.pop_front()
    }

    pub fn ensure_idle(&self) -> SchedResult<()> {
        if self.owner.is_some() || !self.enter_waiters.is_empty() || !self.cond_waiters.is_empty() {
            return Err(SchedError::UsageViolation("freeing a busy monitor"));
        }
        Ok(())
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(n: u32) -> ThreadId {
        ThreadId::new(n)
    }

    #[test]
    fn test_handle_table_tombstones() {
        let mut table: HandleTable<MutexState> = HandleTable::new();
        let a = table.insert(MutexState::new());
        let b = table.insert(MutexState::new());
        assert_eq!(a, 0);
        assert_eq!(b, 1);

        assert!(table.remove(a).is_ok());
        assert_eq!(table.get(a).err(), Some(SchedError::InvalidTarget));
        assert_eq!(table.remove(a).err(), Some(SchedError::InvalidTarget));

        // Handles are never reused
        assert_eq!(table.insert(MutexState::new()), 2);
    }

    #[test]
    fn test_mutex_uncontended() {
        let mut m = MutexState::new();
        assert_eq!(m.acquire_or_wait(tid(1)), Ok(true));
        assert_eq!(m.owner(), Some(tid(1)));
        assert_eq!(m.release(tid(1)), Ok(None));
        assert_eq!(m.owner(), None);
    }

    #[test]
    fn test_mutex_handoff_fifo() {
        let mut m = MutexState::new();
        assert_eq!(m.acquire_or_wait(tid(1)), Ok(true));
        assert_eq!(m.acquire_or_wait(tid(2)), Ok(false));
        m.push_waiter(tid(2));
        assert_eq!(m.acquire_or_wait(tid(3)), Ok(false));
        m.push_waiter(tid(3));

        // First FIFO waiter owns the lock the instant it is released
        assert_eq!(m.release(tid(1)), Ok(Some(tid(2))));
        assert_eq!(m.owner(), Some(tid(2)));
        assert_eq!(m.release(tid(2)), Ok(Some(tid(3))));
        assert_eq!(m.release(tid(3)), Ok(None));
    }

    #[test]
    fn test_mutex_usage_violations() {
        let mut m = MutexState::new();
        m.acquire_or_wait(tid(1)).unwrap();

        assert!(matches!(
            m.acquire_or_wait(tid(1)),
            Err(SchedError::UsageViolation(_))
        ));
        assert!(matches!(
            m.release(tid(2)),
            Err(SchedError::UsageViolation(_))
        ));
        assert!(matches!(m.ensure_idle(), Err(SchedError::UsageViolation(_))));

        m.release(tid(1)).unwrap();
        assert!(m.ensure_idle().is_ok());
    }

    #[test]
    fn test_monitor_enter_exit_handoff() {
        let mut m = MonitorState::new();
        assert_eq!(m.enter_or_wait(tid(1)), Ok(true));
        assert_eq!(m.enter_or_wait(tid(2)), Ok(false));
        m.push_enter_waiter(tid(2));

        assert_eq!(m.exit(tid(1)), Ok(Some(tid(2))));
        assert_eq!(m.owner(), Some(tid(2)));
        assert_eq!(m.exit(tid(2)), Ok(None));
    }

    #[test]
    fn test_monitor_wait_releases_and_queues() {
        let mut m = MonitorState::new();
        m.enter_or_wait(tid(1)).unwrap();
        assert_eq!(m.enter_or_wait(tid(2)), Ok(false));
        m.push_enter_waiter(tid(2));

        // Waiting hands exclusion to the parked enterer in the same step
        assert_eq!(m.begin_wait(tid(1)), Ok(Some(tid(2))));
        assert_eq!(m.owner(), Some(tid(2)));

        // Signal wakes the waiter but does not grant exclusion
        assert_eq!(m.signal(), Some(tid(1)));
        assert_eq!(m.owner(), Some(tid(2)));
        assert_eq!(m.signal(), None);
    }

    #[test]
    fn test_monitor_wait_requires_ownership() {
        let mut m = MonitorState::new();
        m.enter_or_wait(tid(1)).unwrap();
        assert!(matches!(
            m.begin_wait(tid(2)),
            Err(SchedError::UsageViolation(_))
        ));
    }

    #[test]
    fn test_monitor_free_requires_idle() {
        let mut m = MonitorState::new();
        m.enter_or_wait(tid(1)).unwrap();
        m.begin_wait(tid(1)).unwrap();
        // tid(1) is on the condition queue, still busy
        assert!(matches!(m.ensure_idle(), Err(SchedError::UsageViolation(_))));

        assert_eq!(m.signal(), Some(tid(1)));
        assert!(m.ensure_idle().is_ok());
    }
}

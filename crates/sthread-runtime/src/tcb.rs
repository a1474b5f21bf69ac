//! Thread control blocks and the TCB table
//!
//! Every logical thread is one boxed `Tcb` in the table. Ids are table
//! indices assigned monotonically and never recycled: a reclaimed slot
//! is tombstoned so a stale id reports `InvalidTarget` instead of
//! resolving to a different thread. Boxing keeps the `SavedRegs` address
//! stable while the table's backing vector grows.

use crate::arch::SavedRegs;
use crate::stack::ThreadStack;
use sthread_core::error::{SchedError, SchedResult};
use sthread_core::id::ThreadId;
use sthread_core::state::{Priority, ThreadState};

/// Entry closure of a spawned thread, consumed once on first dispatch
pub type EntryFn = Box<dyn FnOnce() -> usize + 'static>;

/// Per-thread record
pub struct Tcb {
    pub id: ThreadId,
    pub state: ThreadState,
    /// Current dispatch priority (adjusted by nice)
    pub priority: Priority,
    /// Priority supplied at creation; the anchor nice never moves
    pub base_priority: Priority,
    /// Meaningful only while Sleeping; cleared on wake
    pub wake_tick: Option<u64>,
    /// Saved machine state; stable address via the owning Box
    pub regs: SavedRegs,
    /// None for the bootstrap thread, which runs on the native stack
    pub stack: Option<ThreadStack>,
    /// Consumed by the trampoline on first activation
    pub entry: Option<EntryFn>,
    /// Set by exit, read by exactly one joiner
    pub exit_value: Option<usize>,
    /// At most one thread may wait for this one to exit
    pub joiner: Option<ThreadId>,
}

impl Tcb {
    fn new(id: ThreadId, priority: Priority) -> Self {
        Self {
            id,
            state: ThreadState::Created,
            priority,
            base_priority: priority,
            wake_tick: None,
            regs: SavedRegs::default(),
            stack: None,
            entry: None,
            exit_value: None,
            joiner: None,
        }
    }
}

/// Table of all live (and zombie) TCBs, indexed by `ThreadId`
pub struct TcbTable {
    slots: Vec<Option<Box<Tcb>>>,
    max_threads: usize,
    live: usize,
}

impl TcbTable {
    pub fn new(max_threads: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_threads,
            live: 0,
        }
    }

    /// Allocate a fresh TCB in `Created` state
    ///
    /// Fails with `ResourceExhausted` once `max_threads` threads are
    /// simultaneously alive; ids themselves are never reused.
    pub fn insert(&mut self, priority: Priority) -> SchedResult<ThreadId> {
        if self.live >= self.max_threads {
            return Err(SchedError::ResourceExhausted);
        }
        let id = ThreadId::new(self.slots.len() as u32);
        self.slots.push(Some(Box::new(Tcb::new(id, priority))));
        self.live += 1;
        Ok(id)
    }

    pub fn get(&self, id: ThreadId) -> Option<&Tcb> {
        self.slots.get(id.as_usize())?.as_deref()
    }

    pub fn get_mut(&mut self, id: ThreadId) -> Option<&mut Tcb> {
        self.slots.get_mut(id.as_usize())?.as_deref_mut()
    }

    /// Remove a TCB, tombstoning its slot
    ///
    /// Dropping the returned box releases the thread's stack mapping.
    pub fn reclaim(&mut self, id: ThreadId) -> Option<Box<Tcb>> {
        let slot = self.slots.get_mut(id.as_usize())?;
        let tcb = slot.take()?;
        self.live -= 1;
        Some(tcb)
    }

    /// Raw pointer to a TCB's saved registers, for the context switch
    pub fn regs_ptr(&mut self, id: ThreadId) -> Option<*mut SavedRegs> {
        self.get_mut(id).map(|tcb| &mut tcb.regs as *mut SavedRegs)
    }

    /// Number of threads currently occupying slots (live + zombie)
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_ids() {
        let mut table = TcbTable::new(16);
        let a = table.insert(Priority::new(5)).unwrap();
        let b = table.insert(Priority::new(5)).unwrap();
        assert_eq!(a.as_u32(), 0);
        assert_eq!(b.as_u32(), 1);
        assert_eq!(table.live_count(), 2);
    }

    #[test]
    fn test_ids_never_recycled() {
        let mut table = TcbTable::new(16);
        let a = table.insert(Priority::new(5)).unwrap();
        assert!(table.reclaim(a).is_some());

        // Tombstoned: the old id no longer resolves
        assert!(table.get(a).is_none());
        assert!(table.reclaim(a).is_none());

        // And the next insert gets a fresh id
        let b = table.insert(Priority::new(5)).unwrap();
        assert_ne!(a, b);
        assert_eq!(b.as_u32(), 1);
    }

    #[test]
    fn test_exhaustion() {
        let mut table = TcbTable::new(2);
        table.insert(Priority::MIN).unwrap();
        table.insert(Priority::MIN).unwrap();
        assert_eq!(
            table.insert(Priority::MIN),
            Err(SchedError::ResourceExhausted)
        );

        // Reclaiming one frees budget for a new thread
        assert!(table.reclaim(ThreadId::new(0)).is_some());
        assert!(table.insert(Priority::MIN).is_ok());
    }

    #[test]
    fn test_base_priority_anchor() {
        let mut table = TcbTable::new(4);
        let id = table.insert(Priority::new(10)).unwrap();
        let tcb = table.get_mut(id).unwrap();
        tcb.priority = tcb.priority.adjusted(5);
        assert_eq!(tcb.priority, Priority::new(15));
        assert_eq!(tcb.base_priority, Priority::new(10));
    }

    #[test]
    fn test_unknown_id() {
        let table = TcbTable::new(4);
        assert!(table.get(ThreadId::new(3)).is_none());
        assert!(table.get(ThreadId::NONE).is_none());
    }
}

//! Sleep queue: min-heap keyed by wake tick
//!
//! Entries carry an insertion sequence number so threads with the same
//! deadline wake in the order they went to sleep, keeping wake order
//! fully deterministic.

use sthread_core::id::ThreadId;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy)]
struct SleepEntry {
    wake_tick: u64,
    seq: u64,
    id: ThreadId,
}

// Min-heap ordering: earliest (wake_tick, seq) first
impl Ord for SleepEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        (other.wake_tick, other.seq).cmp(&(self.wake_tick, self.seq))
    }
}

impl PartialOrd for SleepEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SleepEntry {
    fn eq(&self, other: &Self) -> bool {
        (self.wake_tick, self.seq) == (other.wake_tick, other.seq)
    }
}

impl Eq for SleepEntry {}

/// Threads waiting for the logical clock to reach their deadline
pub struct SleepQueue {
    heap: BinaryHeap<SleepEntry>,
    next_seq: u64,
}

impl SleepQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Register a sleeper to be woken once the clock reaches `wake_tick`
    pub fn push(&mut self, id: ThreadId, wake_tick: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(SleepEntry { wake_tick, seq, id });
    }

    /// Pop the next sleeper whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<ThreadId> {
        if self.heap.peek()?.wake_tick <= now {
            self.heap.pop().map(|e| e.id)
        } else {
            None
        }
    }

    /// Earliest pending deadline
    pub fn next_wake(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.wake_tick)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Snapshot in ascending deadline order, for diagnostics
    pub fn snapshot(&self) -> Vec<(ThreadId, u64)> {
        let mut entries: Vec<&SleepEntry> = self.heap.iter().collect();
        entries.sort_by_key(|e| (e.wake_tick, e.seq));
        entries.iter().map(|e| (e.id, e.wake_tick)).collect()
    }
}

impl Default for SleepQueue {
    fn default() -> Self {
        Self::new()
    }
}

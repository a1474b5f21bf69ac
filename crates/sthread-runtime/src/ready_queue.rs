//! Ready queue: FIFO priority bands with an occupancy bitmap
//!
//! One VecDeque per priority level plus a 32-bit occupancy word, so the
//! highest non-empty band is found with a single leading-zeros scan.
//! FIFO within a band keeps equal-priority dispatch deterministic:
//! threads run in arrival order.

use sthread_core::id::ThreadId;
use sthread_core::state::Priority;
use std::collections::VecDeque;

/// Priority-banded FIFO ready queue
pub struct ReadyQueue {
    bands: [VecDeque<ThreadId>; Priority::LEVELS],
    /// Bit i set when band i is non-empty
    occupied: u32,
    len: usize,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            bands: std::array::from_fn(|_| VecDeque::new()),
            occupied: 0,
            len: 0,
        }
    }

    /// Enqueue at the tail of the thread's priority band
    pub fn push(&mut self, id: ThreadId, priority: Priority) {
        let band = priority.as_index();
        self.bands[band].push_back(id);
        self.occupied |= 1 << band;
        self.len += 1;
    }

    /// Dequeue the longest-waiting thread of the highest occupied band
    pub fn pop(&mut self) -> Option<(ThreadId, Priority)> {
        if self.occupied == 0 {
            return None;
        }
        let band = (31 - self.occupied.leading_zeros()) as usize;
        let id = self.bands[band].pop_front()?;
        if self.bands[band].is_empty() {
            self.occupied &= !(1 << band);
        }
        self.len -= 1;
        Some((id, Priority::new(band as u8)))
    }

    /// Priority of the thread `pop` would return, without dequeuing
    pub fn peek_priority(&self) -> Option<Priority> {
        if self.occupied == 0 {
            return None;
        }
        Some(Priority::new((31 - self.occupied.leading_zeros()) as u8))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate in dispatch order (highest band first, FIFO within bands)
    pub fn iter_dispatch_order(&self) -> impl Iterator<Item = (ThreadId, Priority)> + '_ {
        self.bands
            .iter()
            .enumerate()
            .rev()
            .flat_map(|(band, queue)| {
                queue
                    .iter()
                    .map(move |&id| (id, Priority::new(band as u8)))
            })
    }
}

impl Default for ReadyQueue {
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
    fn test_highest_priority_first() {
        let mut q = ReadyQueue::new();
        q.push(tid(1), Priority::new(3));
        q.push(tid(2), Priority::new(10));
        q.push(tid(3), Priority::new(6));

        assert_eq!(q.pop(), Some((tid(2), Priority::new(10))));
        assert_eq!(q.pop(), Some((tid(3), Priority::new(6))));
        assert_eq!(q.pop(), Some((tid(1), Priority::new(3))));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_fifo_within_band() {
        let mut q = ReadyQueue::new();
        q.push(tid(1), Priority::new(5));
        q.push(tid(2), Priority::new(5));
        q.push(tid(3), Priority::new(5));

        assert_eq!(q.pop().unwrap().0, tid(1));
        assert_eq!(q.pop().unwrap().0, tid(2));
        assert_eq!(q.pop().unwrap().0, tid(3));
    }

    #[test]
    fn test_requeue_goes_to_tail() {
        let mut q = ReadyQueue::new();
        q.push(tid(1), Priority::new(5));
        q.push(tid(2), Priority::new(5));

        let (first, prio) = q.pop().unwrap();
        q.push(first, prio);
        assert_eq!(q.pop().unwrap().0, tid(2));
        assert_eq!(q.pop().unwrap().0, tid(1));
    }

    #[test]
    fn test_peek_and_len() {
        let mut q = ReadyQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.peek_priority(), None);

        q.push(tid(1), Priority::new(2));
        q.push(tid(2), Priority::new(7));
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek_priority(), Some(Priority::new(7)));
    }

    #[test]
    fn test_dispatch_order_iter() {
        let mut q = ReadyQueue::new();
        q.push(tid(1), Priority::new(3));
        q.push(tid(2), Priority::new(10));
        q.push(tid(3), Priority::new(3));

        let order: Vec<u32> = q.iter_dispatch_order().map(|(id, _)| id.as_u32()).collect();
        assert_eq!(order, vec![2, 1, 3]);
        // Iteration does not consume
        assert_eq!(q.len(), 3);
    }
}

//! Structured scheduler diagnostic report
//!
//! `DumpReport` is a non-mutating snapshot of every thread the scheduler
//! knows about, grouped by queue. Tests assert on the structured form;
//! the `Display` impl renders the human-readable text layout.

use crate::id::ThreadId;
use crate::state::Priority;
use core::fmt;

/// One thread's line in a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub id: ThreadId,
    pub priority: Priority,
    /// Populated only for sleeping threads
    pub wake_tick: Option<u64>,
}

impl DumpEntry {
    pub fn new(id: ThreadId, priority: Priority) -> Self {
        Self {
            id,
            priority,
            wake_tick: None,
        }
    }

    pub fn sleeping(id: ThreadId, priority: Priority, wake_tick: u64) -> Self {
        Self {
            id,
            priority,
            wake_tick: Some(wake_tick),
        }
    }
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wake_tick {
            Some(tick) => write!(
                f,
                "tid={} priority={} wake_tick={}",
                self.id, self.priority, tick
            ),
            None => write!(f, "tid={} priority={}", self.id, self.priority),
        }
    }
}

/// Snapshot of the scheduler's queues
///
/// `runnable` is in dispatch order (highest band first, FIFO within a
/// band); `sleeping` is in ascending wake-tick order; `zombies` is in
/// exit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpReport {
    /// Logical clock at snapshot time
    pub clock: u64,
    /// The single running thread, if the snapshot was taken from one
    pub running: Option<DumpEntry>,
    pub runnable: Vec<DumpEntry>,
    pub sleeping: Vec<DumpEntry>,
    pub zombies: Vec<DumpEntry>,
}

impl DumpReport {
    /// Total number of threads in the snapshot
    pub fn thread_count(&self) -> usize {
        self.running.iter().count()
            + self.runnable.len()
            + self.sleeping.len()
            + self.zombies.len()
    }

    /// Number of threads observed as running (0 or 1 by invariant)
    pub fn running_count(&self) -> usize {
        self.running.iter().count()
    }
}

impl fmt::Display for DumpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- thread dump ---")?;
        writeln!(f, "clock: {}", self.clock)?;
        match &self.running {
            Some(entry) => writeln!(f, "active: {}", entry)?,
            None => writeln!(f, "active: none")?,
        }

        writeln!(f, "[runnable]")?;
        for entry in &self.runnable {
            writeln!(f, "{}", entry)?;
        }
        writeln!(f, "[sleeping]")?;
        for entry in &self.sleeping {
            writeln!(f, "{}", entry)?;
        }
        writeln!(f, "[zombie]")?;
        for entry in &self.zombies {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let report = DumpReport {
            clock: 7,
            running: Some(DumpEntry::new(ThreadId::new(0), Priority::new(15))),
            runnable: vec![DumpEntry::new(ThreadId::new(1), Priority::new(10))],
            sleeping: vec![DumpEntry::sleeping(ThreadId::new(2), Priority::new(6), 12)],
            zombies: vec![],
        };
        assert_eq!(report.thread_count(), 3);
        assert_eq!(report.running_count(), 1);
    }

    #[test]
    fn test_render() {
        let report = DumpReport {
            clock: 3,
            running: None,
            runnable: vec![],
            sleeping: vec![DumpEntry::sleeping(ThreadId::new(4), Priority::new(3), 9)],
            zombies: vec![DumpEntry::new(ThreadId::new(5), Priority::new(1))],
        };
        let text = format!("{}", report);
        assert!(text.contains("clock: 3"));
        assert!(text.contains("active: none"));
        assert!(text.contains("tid=4 priority=3 wake_tick=9"));
        assert!(text.contains("tid=5 priority=1"));
    }
}

//! # sthread - Cooperative User-Space Threads
//!
//! Many logical threads multiplexed onto one native execution context,
//! with their own scheduler, priority model, blocking primitives, and
//! thread lifecycle management.
//!
//! ## Features
//!
//! - **Lightweight**: mmap'd stack with a guard page per thread, TCB in
//!   a table slot
//! - **Fast Context Switch**: voluntary yield via hand-written assembly
//!   (x86_64 and aarch64), only callee-saved registers cross the switch
//! - **Priority Scheduling**: 32 levels, higher value wins, FIFO within
//!   a level, client-driven `nice`
//! - **Logical Time**: tick-based sleep driven by dispatch decisions,
//!   fully deterministic
//! - **Synchronization**: mutexes and monitors with direct-hand-off
//!   wakeup built on the scheduler's block/wake mechanism
//!
//! ## Quick Start
//!
//! ```ignore
//! use sthread::{init, spawn, join, yield_now, Priority};
//!
//! fn main() {
//!     init().expect("scheduler init");
//!
//!     let worker = spawn(
//!         || {
//!             println!("hello from a green thread");
//!             yield_now().unwrap();
//!             42
//!         },
//!         Priority::new(10),
//!     )
//!     .expect("spawn");
//!
//!     let value = join(worker).expect("join");
//!     assert_eq!(value, 42);
//! }
//! ```
//!
//! ## Scheduling model
//!
//! The scheduler is strictly cooperative: a thread runs until it yields,
//! sleeps, blocks, or exits. Every dispatch decision advances a logical
//! clock by one tick; sleeping threads wake when the clock reaches their
//! deadline. Exactly one thread is running at any observation point, and
//! blocking calls that could never be woken again are refused with
//! `SchedError::Starvation` instead of deadlocking.

// Re-export core types
pub use sthread_core::dump::{DumpEntry, DumpReport};
pub use sthread_core::error::{SchedError, SchedResult};
pub use sthread_core::id::{MonitorHandle, MutexHandle, ThreadId};
pub use sthread_core::state::{Priority, ThreadState};

// Re-export kprint macros for debug logging
pub use sthread_core::kprint::{
    init as init_logging, set_flush_enabled, set_log_level, LogLevel,
};
pub use sthread_core::{kdebug, kerror, kinfo, kprintln, ktrace, kwarn};

// Re-export env utilities
pub use sthread_core::env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

// Re-export runtime configuration
pub use sthread_runtime::SchedulerConfig;

use sthread_runtime::scheduler;

/// Initialize the runtime with environment-derived configuration
///
/// Adopts the calling context as thread 0, running at
/// `SchedulerConfig::main_priority`, and returns its id. Must be called
/// exactly once before any other operation; everything else reports
/// `NotInitialized` until then.
pub fn init() -> SchedResult<ThreadId> {
    scheduler::init()
}

/// Initialize the runtime with an explicit configuration
pub fn init_with_config(config: SchedulerConfig) -> SchedResult<ThreadId> {
    scheduler::init_with_config(config)
}

/// Check whether the runtime is initialized
#[inline]
pub fn is_initialized() -> bool {
    scheduler::is_initialized()
}

/// Create a new thread running `f` at the given priority
///
/// The new thread is immediately eligible to run but does not run until
/// the caller yields or blocks. `f`'s return value becomes its exit
/// value, exactly as if it had called [`exit`] itself.
pub fn spawn<F>(f: F, priority: Priority) -> SchedResult<ThreadId>
where
    F: FnOnce() -> usize + 'static,
{
    scheduler::spawn(f, priority)
}

/// Terminate the calling thread, recording `value` for its joiner
///
/// The thread holds its value as a zombie until joined. If the last
/// thread exits with nothing left to run or wake, the process
/// terminates with status 0.
pub fn exit(value: usize) -> ! {
    scheduler::exit_current(value)
}

/// Give up the CPU voluntarily
///
/// The caller moves to the tail of its priority band and the
/// highest-priority ready thread runs. With no other runnable thread
/// this returns immediately.
#[inline]
pub fn yield_now() -> SchedResult<()> {
    scheduler::yield_now()
}

/// Sleep for at least `ticks` logical ticks
///
/// Zero or negative counts degrade to an immediate yield. Time is
/// logical: the clock advances once per dispatch decision, so a thread
/// sleeping alone wakes after exactly `ticks` decisions.
#[inline]
pub fn sleep(ticks: i64) -> SchedResult<()> {
    scheduler::sleep(ticks)
}

/// Wait for `target` to exit and collect its exit value
///
/// Blocks if the target is still running; returns immediately with the
/// stored value if it already exited. At most one thread may join a
/// given target (`AlreadyJoined` otherwise); joining yourself is a
/// `UsageViolation`. The target's resources are reclaimed here and its
/// id is dead afterwards (`InvalidTarget`).
pub fn join(target: ThreadId) -> SchedResult<usize> {
    scheduler::join(target)
}

/// Id of the calling thread
#[inline]
pub fn current_id() -> SchedResult<ThreadId> {
    scheduler::current_id()
}

/// Adjust the calling thread's priority by a signed delta
///
/// The result is clamped to the valid priority range and applies from
/// the caller's next enqueue. The creation-time base priority is not
/// affected. Returns the new effective priority.
pub fn nice(delta: i32) -> SchedResult<Priority> {
    scheduler::nice(delta)
}

/// Snapshot every thread the scheduler knows about
///
/// Non-mutating: queue contents and clock are unchanged. The report
/// groups threads by queue and renders the classic text layout via
/// `Display`.
pub fn dump() -> SchedResult<DumpReport> {
    scheduler::dump()
}

// ============================================================================
// Mutexes
// ============================================================================

/// Create a mutex, initially unowned
pub fn mutex_init() -> SchedResult<MutexHandle> {
    scheduler::mutex_init()
}

/// Acquire a mutex, blocking while another thread owns it
///
/// Waiters queue FIFO and release hands ownership directly to the first
/// of them, so on return the caller always owns the lock. Mutexes are
/// not reentrant.
pub fn mutex_lock(handle: MutexHandle) -> SchedResult<()> {
    scheduler::mutex_lock(handle)
}

/// Release a mutex owned by the caller
pub fn mutex_unlock(handle: MutexHandle) -> SchedResult<()> {
    scheduler::mutex_unlock(handle)
}

/// Destroy a mutex; it must be unowned with no waiters
pub fn mutex_free(handle: MutexHandle) -> SchedResult<()> {
    scheduler::mutex_free(handle)
}

// ============================================================================
// Monitors
// ============================================================================

/// Create a monitor, initially unowned
pub fn monitor_init() -> SchedResult<MonitorHandle> {
    scheduler::monitor_init()
}

/// Enter a monitor's exclusive section, blocking while it is held
pub fn monitor_enter(handle: MonitorHandle) -> SchedResult<()> {
    scheduler::monitor_enter(handle)
}

/// Leave a monitor's exclusive section, handing it to the next enterer
pub fn monitor_exit(handle: MonitorHandle) -> SchedResult<()> {
    scheduler::monitor_exit(handle)
}

/// Atomically release exclusion and wait to be signalled
///
/// Requires holding the monitor. Release and registration on the
/// condition queue happen in one scheduler transition, so no signal can
/// be lost in between. Once signalled the caller re-competes for entry;
/// on return it holds exclusion again.
pub fn monitor_wait(handle: MonitorHandle) -> SchedResult<()> {
    scheduler::monitor_wait(handle)
}

/// Wake exactly one condition waiter (no-op when none wait)
///
/// Ownership of the monitor is not required to signal.
pub fn monitor_signal(handle: MonitorHandle) -> SchedResult<()> {
    scheduler::monitor_signal(handle)
}

/// Destroy a monitor; it must be unowned with no waiters of either kind
pub fn monitor_free(handle: MonitorHandle) -> SchedResult<()> {
    scheduler::monitor_free(handle)
}

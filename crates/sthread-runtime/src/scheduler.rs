//! Scheduler core
//!
//! Orchestrates all components: TCB table, ready/sleep/zombie queues,
//! logical clock, context switching, and the mutex/monitor primitives.
//!
//! The runtime multiplexes all logical threads onto the single native
//! thread that called `init()`. The scheduler lives in a global slot so
//! every logical thread reaches the same instance; accesses are strictly
//! sequential because only one logical thread executes at a time.
//!
//! # Borrow discipline around the context switch
//!
//! Every operation that switches away does its bookkeeping under a
//! `&mut Scheduler` borrow, ends the borrow, and only then calls
//! `context_switch` with raw `SavedRegs` pointers. `Box<Tcb>` keeps those
//! pointers stable while the table's backing vector grows, so no Rust
//! reference is alive across the jump.

use crate::arch;
use crate::clock::LogicalClock;
use crate::config::SchedulerConfig;
use crate::current_arch;
use crate::ready_queue::ReadyQueue;
use crate::sleep_queue::SleepQueue;
use crate::stack::ThreadStack;
use crate::sync::{HandleTable, MonitorState, MutexState};
use crate::tcb::{EntryFn, TcbTable};

use sthread_core::dump::{DumpEntry, DumpReport};
use sthread_core::error::{SchedError, SchedResult};
use sthread_core::id::{MonitorHandle, MutexHandle, ThreadId};
use sthread_core::state::{Priority, ThreadState};
use sthread_core::{kdebug, kerror};

use std::collections::VecDeque;

/// Global scheduler instance
static mut SCHEDULER: Option<Scheduler> = None;

/// Access the global scheduler
///
/// Single-native-thread runtime: the only concurrency is cooperative, so
/// borrows taken here are strictly sequential. Callers must end the
/// returned borrow before any context switch.
fn scheduler_mut() -> SchedResult<&'static mut Scheduler> {
    unsafe {
        (*core::ptr::addr_of_mut!(SCHEDULER))
            .as_mut()
            .ok_or(SchedError::NotInitialized)
    }
}

/// Main scheduler
pub struct Scheduler {
    config: SchedulerConfig,
    clock: LogicalClock,
    tcbs: TcbTable,
    ready: ReadyQueue,
    sleepers: SleepQueue,
    /// Exited threads holding their value until joined, in exit order
    zombies: VecDeque<ThreadId>,
    /// The single running thread
    current: ThreadId,
    mutexes: HandleTable<MutexState>,
    monitors: HandleTable<MonitorState>,
}

impl Scheduler {
    /// Create a scheduler; the config must already be validated
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            clock: LogicalClock::new(),
            tcbs: TcbTable::new(config.max_threads),
            ready: ReadyQueue::new(),
            sleepers: SleepQueue::new(),
            zombies: VecDeque::new(),
            current: ThreadId::NONE,
            mutexes: HandleTable::new(),
            monitors: HandleTable::new(),
            config,
        }
    }

    /// Adopt the calling context as thread 0
    ///
    /// The bootstrap thread runs on the native stack, so it carries no
    /// owned stack mapping; its registers are only ever written by a
    /// switch away from it.
    fn bootstrap(&mut self) -> SchedResult<ThreadId> {
        let id = self.tcbs.insert(self.config.main_priority)?;
        if let Some(tcb) = self.tcbs.get_mut(id) {
            tcb.state = ThreadState::Running;
        }
        self.current = id;
        Ok(id)
    }

    /// Advance the clock one tick and wake every sleeper that is due
    ///
    /// Sleepers wake in ascending (wake_tick, seq) order, each to the
    /// tail of its priority band.
    fn tick(&mut self) {
        let now = self.clock.advance();
        while let Some(id) = self.sleepers.pop_due(now) {
            self.make_ready(id);
        }
    }

    /// Move a thread to the ready queue at its current priority
    fn make_ready(&mut self, id: ThreadId) {
        if let Some(tcb) = self.tcbs.get_mut(id) {
            tcb.state = ThreadState::Ready;
            tcb.wake_tick = None;
            let priority = tcb.priority;
            self.ready.push(id, priority);
        }
    }

    /// Re-enqueue the running thread at the tail of its band
    fn requeue_current(&mut self) {
        let me = self.current;
        self.make_ready(me);
    }

    /// Pick the next thread to run
    ///
    /// Ticks once per dispatch decision. When only sleepers remain, keeps
    /// ticking until the earliest one wakes; with nothing ready and
    /// nothing sleeping there is no future wakeup, which is starvation.
    fn pick_next(&mut self) -> SchedResult<ThreadId> {
        self.tick();
        loop {
            if let Some((id, _)) = self.ready.pop() {
                return Ok(id);
            }
            if self.sleepers.is_empty() {
                return Err(SchedError::Starvation);
            }
            self.tick();
        }
    }

    fn set_running(&mut self, id: ThreadId) {
        self.current = id;
        if let Some(tcb) = self.tcbs.get_mut(id) {
            tcb.state = ThreadState::Running;
            tcb.wake_tick = None;
        }
    }

    /// Refuse to block when no other thread could ever wake the caller
    ///
    /// `wakeable_elsewhere` covers wakeups the caller itself is about to
    /// create (a monitor wait handing exclusion to a parked enterer).
    fn ensure_can_block(&self, wakeable_elsewhere: bool) -> SchedResult<()> {
        if self.ready.is_empty() && self.sleepers.is_empty() && !wakeable_elsewhere {
            return Err(SchedError::Starvation);
        }
        Ok(())
    }

    fn take_entry(&mut self, id: ThreadId) -> Option<EntryFn> {
        self.tcbs.get_mut(id).and_then(|tcb| tcb.entry.take())
    }

    /// Reclaim a zombie, returning its exit value
    fn reap(&mut self, id: ThreadId) -> SchedResult<usize> {
        match self.tcbs.get(id) {
            Some(tcb) if tcb.state.is_zombie() => {}
            Some(_) => return Err(SchedError::UsageViolation("reaping a live thread")),
            None => return Err(SchedError::InvalidTarget),
        }
        self.zombies.retain(|&z| z != id);
        let tcb = self.tcbs.reclaim(id).ok_or(SchedError::InvalidTarget)?;
        Ok(tcb.exit_value.unwrap_or(0))
    }

    /// Non-mutating snapshot of every thread, grouped by queue
    fn dump(&self) -> DumpReport {
        let running = self
            .tcbs
            .get(self.current)
            .map(|tcb| DumpEntry::new(tcb.id, tcb.priority));

        let runnable = self
            .ready
            .iter_dispatch_order()
            .map(|(id, priority)| DumpEntry::new(id, priority))
            .collect();

        let sleeping = self
            .sleepers
            .snapshot()
            .into_iter()
            .filter_map(|(id, wake_tick)| {
                self.tcbs
                    .get(id)
                    .map(|tcb| DumpEntry::sleeping(id, tcb.priority, wake_tick))
            })
            .collect();

        let zombies = self
            .zombies
            .iter()
            .filter_map(|&id| {
                self.tcbs
                    .get(id)
                    .map(|tcb| DumpEntry::new(id, tcb.priority))
            })
            .collect();

        DumpReport {
            clock: self.clock.now(),
            running,
            runnable,
            sleeping,
            zombies,
        }
    }
}

// ============================================================================
// Lifecycle surface
// ============================================================================

/// Initialize the runtime with environment-derived configuration
///
/// Adopts the calling context as thread 0 and returns its id.
pub fn init() -> SchedResult<ThreadId> {
    init_with_config(SchedulerConfig::from_env())
}

/// Initialize the runtime with an explicit configuration
pub fn init_with_config(config: SchedulerConfig) -> SchedResult<ThreadId> {
    config.validate()?;
    unsafe {
        let slot = &mut *core::ptr::addr_of_mut!(SCHEDULER);
        if slot.is_some() {
            return Err(SchedError::AlreadyInitialized);
        }
        let mut sched = Scheduler::new(config);
        let main_id = sched.bootstrap()?;
        *slot = Some(sched);
        Ok(main_id)
    }
}

/// Check whether `init` has run
pub fn is_initialized() -> bool {
    unsafe { (*core::ptr::addr_of!(SCHEDULER)).is_some() }
}

/// Create a new thread running `f` at the given priority
///
/// The thread is ready immediately but does not run until the caller
/// yields or blocks. `f`'s return value becomes the exit value, exactly
/// as if it had called `exit` itself.
pub fn spawn<F>(f: F, priority: Priority) -> SchedResult<ThreadId>
where
    F: FnOnce() -> usize + 'static,
{
    let sched = scheduler_mut()?;
    let id = sched.tcbs.insert(priority)?;
    let stack = match ThreadStack::allocate(sched.config.stack_size) {
        Ok(stack) => stack,
        Err(e) => {
            sched.tcbs.reclaim(id);
            return Err(e);
        }
    };
    let stack_top = stack.top();
    {
        let tcb = sched.tcbs.get_mut(id).ok_or(SchedError::InvalidTarget)?;
        tcb.stack = Some(stack);
        tcb.entry = Some(Box::new(f));
        unsafe {
            current_arch::init_context(
                &mut tcb.regs,
                stack_top,
                arch::thread_entry as usize,
                id.as_usize(),
            );
        }
    }
    sched.make_ready(id);
    if sched.config.debug_logging {
        kdebug!("spawn: tid={} priority={}", id, priority);
    }
    Ok(id)
}

/// Give up the CPU, moving to the tail of the caller's priority band
pub fn yield_now() -> SchedResult<()> {
    scheduler_mut()?.requeue_current();
    block_and_dispatch()
}

/// Sleep for at least `ticks` logical ticks
///
/// A zero or negative count degrades to an immediate yield. A thread
/// sleeping alone does not deadlock; the clock spins until it wakes.
pub fn sleep(ticks: i64) -> SchedResult<()> {
    if ticks <= 0 {
        return yield_now();
    }
    {
        let sched = scheduler_mut()?;
        let me = sched.current;
        let wake_tick = sched.clock.now() + ticks as u64;
        if let Some(tcb) = sched.tcbs.get_mut(me) {
            tcb.state = ThreadState::Sleeping;
            tcb.wake_tick = Some(wake_tick);
        }
        sched.sleepers.push(me, wake_tick);
    }
    block_and_dispatch()
}

/// Terminate the calling thread with an exit value
///
/// The thread becomes a zombie until joined; a blocked joiner is woken
/// here. When the last thread exits with nothing runnable and nothing
/// sleeping, the process terminates with status 0.
pub fn exit_current(value: usize) -> ! {
    let switch = {
        let sched = match scheduler_mut() {
            Ok(sched) => sched,
            Err(_) => {
                kerror!("thread exit before scheduler init");
                std::process::exit(0);
            }
        };
        let prev = sched.current;
        let joiner = match sched.tcbs.get_mut(prev) {
            Some(tcb) => {
                tcb.state = ThreadState::Zombie;
                tcb.exit_value = Some(value);
                tcb.joiner.take()
            }
            None => None,
        };
        if let Some(j) = joiner {
            sched.make_ready(j);
        }
        sched.zombies.push_back(prev);
        if sched.config.debug_logging {
            kdebug!("exit: tid={} value={}", prev, value);
        }
        match sched.pick_next() {
            Ok(next) => {
                sched.set_running(next);
                let old = sched.tcbs.regs_ptr(prev);
                let new = sched.tcbs.regs_ptr(next);
                old.zip(new)
            }
            Err(_) => None,
        }
    };
    match switch {
        Some((old, new)) => {
            unsafe { current_arch::context_switch(old, new) };
            unreachable!("zombie thread resumed")
        }
        // Last thread out: no one left to run, no one left to wake
        None => std::process::exit(0),
    }
}

/// Wait for `target` to exit and collect its exit value
///
/// At most one thread may join a given target. The target's TCB and
/// stack are reclaimed here; its id is dead afterwards.
pub fn join(target: ThreadId) -> SchedResult<usize> {
    let must_block = {
        let sched = scheduler_mut()?;
        let me = sched.current;
        if target == me {
            return Err(SchedError::UsageViolation("join with self"));
        }
        let (is_zombie, has_joiner) = {
            let tcb = sched.tcbs.get(target).ok_or(SchedError::InvalidTarget)?;
            (tcb.state.is_zombie(), tcb.joiner.is_some())
        };
        if has_joiner {
            return Err(SchedError::AlreadyJoined);
        }
        if is_zombie {
            false
        } else {
            sched.ensure_can_block(false)?;
            if let Some(tcb) = sched.tcbs.get_mut(target) {
                tcb.joiner = Some(me);
            }
            if let Some(tcb) = sched.tcbs.get_mut(me) {
                tcb.state = ThreadState::Blocked;
            }
            true
        }
    };
    if must_block {
        block_and_dispatch()?;
        // Woken by the target's exit; it is a zombie now
    }
    scheduler_mut()?.reap(target)
}

/// Id of the calling thread
pub fn current_id() -> SchedResult<ThreadId> {
    Ok(scheduler_mut()?.current)
}

/// Adjust the calling thread's priority by a signed delta
///
/// Clamped to the valid range; the creation-time base priority is left
/// untouched. Returns the new effective priority, which applies from the
/// next enqueue.
pub fn nice(delta: i32) -> SchedResult<Priority> {
    let sched = scheduler_mut()?;
    let me = sched.current;
    let tcb = sched.tcbs.get_mut(me).ok_or(SchedError::InvalidTarget)?;
    tcb.priority = tcb.priority.adjusted(delta);
    Ok(tcb.priority)
}

/// Snapshot every thread the scheduler knows about
pub fn dump() -> SchedResult<DumpReport> {
    Ok(scheduler_mut()?.dump())
}

/// Entry shim target: run a thread's entry closure to completion
pub(crate) fn run_entry(raw_id: usize) -> usize {
    let id = ThreadId::new(raw_id as u32);
    let entry = match scheduler_mut() {
        Ok(sched) => sched.take_entry(id),
        Err(_) => None,
    };
    match entry {
        Some(f) => f(),
        None => {
            kerror!("tid={} dispatched without an entry closure", id);
            0
        }
    }
}

// ============================================================================
// Mutex surface
// ============================================================================

/// Create a mutex, initially unowned
pub fn mutex_init() -> SchedResult<MutexHandle> {
    let sched = scheduler_mut()?;
    Ok(MutexHandle::new(sched.mutexes.insert(MutexState::new())))
}

/// Acquire a mutex, blocking while another thread owns it
///
/// On return the caller owns the lock: release hands ownership directly
/// to the first FIFO waiter. Relocking a held mutex is a usage
/// violation; blocking with no other thread to wake us is starvation,
/// reported without blocking.
pub fn mutex_lock(handle: MutexHandle) -> SchedResult<()> {
    let acquired = {
        let sched = scheduler_mut()?;
        let me = sched.current;
        let acquired = sched.mutexes.get_mut(handle.as_u32())?.acquire_or_wait(me)?;
        if !acquired {
            sched.ensure_can_block(false)?;
            sched.mutexes.get_mut(handle.as_u32())?.push_waiter(me);
            if let Some(tcb) = sched.tcbs.get_mut(me) {
                tcb.state = ThreadState::Blocked;
            }
        }
        acquired
    };
    if acquired {
        Ok(())
    } else {
        // Resumes owning the lock (hand-off)
        block_and_dispatch()
    }
}

/// Release a mutex owned by the caller
pub fn mutex_unlock(handle: MutexHandle) -> SchedResult<()> {
    let sched = scheduler_mut()?;
    let me = sched.current;
    let handed_off = sched.mutexes.get_mut(handle.as_u32())?.release(me)?;
    if let Some(waiter) = handed_off {
        sched.make_ready(waiter);
    }
    Ok(())
}

/// Destroy a mutex; it must be unowned with no waiters
pub fn mutex_free(handle: MutexHandle) -> SchedResult<()> {
    let sched = scheduler_mut()?;
    sched.mutexes.get(handle.as_u32())?.ensure_idle()?;
    sched.mutexes.remove(handle.as_u32())?;
    Ok(())
}

// ============================================================================
// Monitor surface
// ============================================================================

/// Create a monitor, initially unowned
pub fn monitor_init() -> SchedResult<MonitorHandle> {
    let sched = scheduler_mut()?;
    Ok(MonitorHandle::new(
        sched.monitors.insert(MonitorState::new()),
    ))
}

/// Enter a monitor's exclusive section, blocking while it is held
pub fn monitor_enter(handle: MonitorHandle) -> SchedResult<()> {
    let entered = {
        let sched = scheduler_mut()?;
        let me = sched.current;
        let entered = sched.monitors.get_mut(handle.as_u32())?.enter_or_wait(me)?;
        if !entered {
            sched.ensure_can_block(false)?;
            sched
                .monitors
                .get_mut(handle.as_u32())?
                .push_enter_waiter(me);
            if let Some(tcb) = sched.tcbs.get_mut(me) {
                tcb.state = ThreadState::Blocked;
            }
        }
        entered
    };
    if entered {
        Ok(())
    } else {
        // Resumes holding exclusion (hand-off)
        block_and_dispatch()
    }
}

/// Leave a monitor's exclusive section
pub fn monitor_exit(handle: MonitorHandle) -> SchedResult<()> {
    let sched = scheduler_mut()?;
    let me = sched.current;
    let handed_off = sched.monitors.get_mut(handle.as_u32())?.exit(me)?;
    if let Some(waiter) = handed_off {
        sched.make_ready(waiter);
    }
    Ok(())
}

/// Atomically release exclusion and wait for a signal
///
/// Release and condition-queue registration happen in one scheduler
/// transition, so no signal can slip between them. Once signalled the
/// caller re-competes for entry like any other enterer; on return it
/// holds exclusion again.
pub fn monitor_wait(handle: MonitorHandle) -> SchedResult<()> {
    {
        let sched = scheduler_mut()?;
        let me = sched.current;
        let wakeable = {
            let monitor = sched.monitors.get(handle.as_u32())?;
            if monitor.owner() != Some(me) {
                return Err(SchedError::UsageViolation("wait outside a held monitor"));
            }
            // Handing exclusion to a parked enterer makes it runnable,
            // so blocking is safe even with empty queues
            monitor.has_enter_waiters()
        };
        sched.ensure_can_block(wakeable)?;
        let handed_off = sched.monitors.get_mut(handle.as_u32())?.begin_wait(me)?;
        if let Some(waiter) = handed_off {
            sched.make_ready(waiter);
        }
        if let Some(tcb) = sched.tcbs.get_mut(me) {
            tcb.state = ThreadState::Blocked;
        }
    }
    block_and_dispatch()?;
    // Signalled; exclusion is not handed to us, take the enter path
    monitor_enter(handle)
}

/// Wake exactly one condition waiter
///
/// Ownership is not required; with no waiters this is a no-op. The woken
/// thread becomes ready and contends for entry, it does not receive
/// exclusion here.
pub fn monitor_signal(handle: MonitorHandle) -> SchedResult<()> {
    let sched = scheduler_mut()?;
    let woken = sched.monitors.get_mut(handle.as_u32())?.signal();
    if let Some(waiter) = woken {
        sched.make_ready(waiter);
    }
    Ok(())
}

/// Destroy a monitor; it must be unowned with no waiters of either kind
pub fn monitor_free(handle: MonitorHandle) -> SchedResult<()> {
    let sched = scheduler_mut()?;
    sched.monitors.get(handle.as_u32())?.ensure_idle()?;
    sched.monitors.remove(handle.as_u32())?;
    Ok(())
}

// ============================================================================
// Dispatch
// ============================================================================

/// Dispatch the next ready thread and switch to it
///
/// The caller must already have parked itself (re-queued, sleeping, or
/// blocked in a wait set). Returns when the caller is dispatched again.
/// When the caller itself is picked (it was the only runnable thread)
/// the switch is skipped.
fn block_and_dispatch() -> SchedResult<()> {
    let (old, new) = {
        let sched = scheduler_mut()?;
        let prev = sched.current;
        let next = sched.pick_next()?;
        sched.set_running(next);
        if sched.config.debug_logging {
            kdebug!(
                "dispatch: tid={} -> tid={} clock={}",
                prev,
                next,
                sched.clock.now()
            );
        }
        if prev == next {
            return Ok(());
        }
        let old = sched.tcbs.regs_ptr(prev).ok_or(SchedError::InvalidTarget)?;
        let new = sched.tcbs.regs_ptr(next).ok_or(SchedError::InvalidTarget)?;
        (old, new)
    };
    // No scheduler borrow is alive past this point
    unsafe { current_arch::context_switch(old, new) };
    Ok(())
}

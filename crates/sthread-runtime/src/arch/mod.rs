//! Architecture-specific context switching
//!
//! Everything that touches raw machine state lives behind this module:
//! the saved-register layout, the voluntary context switch, and the
//! trampoline that gives every thread its first activation. The rest of
//! the runtime only ever sees `SavedRegs` as an opaque owned value and
//! hands raw pointers to `context_switch`.

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub use x86_64::SavedRegs;
    } else if #[cfg(target_arch = "aarch64")] {
        pub use aarch64::SavedRegs;
    }
}

/// Entry shim passed to the trampoline; receives the raw thread id,
/// runs the thread's entry closure, and returns its exit value.
///
/// A panic escaping the closure crosses an `extern "C"` boundary and
/// aborts the process; cooperative threads are expected to report
/// failures through their exit value instead.
pub(crate) extern "C" fn thread_entry(raw_id: usize) -> usize {
    crate::scheduler::run_entry(raw_id)
}

/// Called by the trampoline when a thread's entry function returns.
///
/// Funnels "fell off the end" into the normal exit path so a returning
/// thread can never resume into a dead stack frame.
pub(crate) extern "C" fn thread_finished(value: usize) {
    crate::scheduler::exit_current(value);
}

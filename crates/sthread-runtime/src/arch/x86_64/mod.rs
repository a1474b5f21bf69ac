//! x86_64 context switching implementation
//!
//! Voluntary switches only save the System V callee-saved registers;
//! everything else is dead across the cooperative call boundary.

use std::arch::naked_asm;

/// Saved execution context for a suspended thread
///
/// Field order is load-bearing: the assembly below addresses these
/// slots by fixed offsets.
#[repr(C)]
#[derive(Debug, Default)]
pub struct SavedRegs {
    pub rsp: u64, // 0x00
    pub rip: u64, // 0x08
    pub rbx: u64, // 0x10
    pub rbp: u64, // 0x18
    pub r12: u64, // 0x20
    pub r13: u64, // 0x28
    pub r14: u64, // 0x30
    pub r15: u64, // 0x38
}

/// Initialize a new thread's context
///
/// Sets up `regs` so the first switch to this thread lands in the
/// trampoline with the entry shim in r12 and its argument in r13.
///
/// # Safety
///
/// `regs` must point to valid `SavedRegs` memory and `stack_top` must be
/// the high end of a mapped stack owned by the same thread.
pub unsafe fn init_context(
    regs: *mut SavedRegs,
    stack_top: *mut u8,
    entry_fn: usize,
    entry_arg: usize,
) {
    // 16-byte aligned so the trampoline's own `call` leaves the entry
    // function with the ABI-required rsp % 16 == 8.
    let aligned_sp = (stack_top as usize) & !0xF;

    let regs = &mut *regs;
    regs.rsp = aligned_sp as u64;
    regs.rip = thread_trampoline as usize as u64;
    regs.rbx = 0;
    regs.rbp = 0;
    regs.r12 = entry_fn as u64;
    regs.r13 = entry_arg as u64;
    regs.r14 = 0;
    regs.r15 = 0;
}

/// First-activation trampoline
///
/// Calls the entry shim with its argument, then funnels the returned
/// exit value into the exit path. Control never falls off the end.
#[unsafe(naked)]
unsafe extern "C" fn thread_trampoline() {
    naked_asm!(
        "mov rdi, r13",
        "call r12",
        "mov rdi, rax",
        "call {finished}",
        "ud2",
        finished = sym super::thread_finished,
    );
}

/// Perform a voluntary context switch
///
/// Saves callee-saved registers into `old_regs` and resumes the context
/// in `new_regs`. Returns (much) later, when some other thread switches
/// back to `old_regs`.
///
/// # Safety
///
/// Both pointers must reference `SavedRegs` that stay valid until the
/// owning threads are reclaimed; `new_regs` must hold either a context
/// captured by this function or one built by `init_context`.
#[unsafe(naked)]
pub unsafe extern "C" fn context_switch(_old_regs: *mut SavedRegs, _new_regs: *const SavedRegs) {
    naked_asm!(
        // Save callee-saved registers to old_regs (RDI)
        "mov [rdi + 0x00], rsp",
        "lea rax, [rip + 1f]",
        "mov [rdi + 0x08], rax",
        "mov [rdi + 0x10], rbx",
        "mov [rdi + 0x18], rbp",
        "mov [rdi + 0x20], r12",
        "mov [rdi + 0x28], r13",
        "mov [rdi + 0x30], r14",
        "mov [rdi + 0x38], r15",
        // Load callee-saved registers from new_regs (RSI)
        "mov rsp, [rsi + 0x00]",
        "mov rax, [rsi + 0x08]",
        "mov rbx, [rsi + 0x10]",
        "mov rbp, [rsi + 0x18]",
        "mov r12, [rsi + 0x20]",
        "mov r13, [rsi + 0x28]",
        "mov r14, [rsi + 0x30]",
        "mov r15, [rsi + 0x38]",
        // Jump to new RIP
        "jmp rax",
        // Resume point for the saved context
        "1:",
        "ret",
    );
}

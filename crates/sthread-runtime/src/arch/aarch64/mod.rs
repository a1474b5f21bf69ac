//! aarch64 context switching implementation
//!
//! Saves the AAPCS64 callee-saved set: x19-x28, the frame pointer, sp,
//! the resume address, and d8-d15.

use std::arch::naked_asm;

/// Saved execution context for a suspended thread
///
/// Field order is load-bearing: the assembly below addresses these
/// slots by fixed offsets.
#[repr(C)]
#[derive(Debug, Default)]
pub struct SavedRegs {
    pub sp: u64,  // 0x00
    pub pc: u64,  // 0x08 - resume address
    pub x19: u64, // 0x10
    pub x20: u64, // 0x18
    pub x21: u64, // 0x20
    pub x22: u64, // 0x28
    pub x23: u64, // 0x30
    pub x24: u64, // 0x38
    pub x25: u64, // 0x40
    pub x26: u64, // 0x48
    pub x27: u64, // 0x50
    pub x28: u64, // 0x58
    pub fp: u64,  // 0x60 - x29
    pub d8: u64,  // 0x68
    pub d9: u64,  // 0x70
    pub d10: u64, // 0x78
    pub d11: u64, // 0x80
    pub d12: u64, // 0x88
    pub d13: u64, // 0x90
    pub d14: u64, // 0x98
    pub d15: u64, // 0xA0
}

/// Initialize a new thread's context
///
/// Sets up `regs` so the first switch to this thread lands in the
/// trampoline with the entry shim in x19 and its argument in x20.
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
    // sp must stay 16-byte aligned at all times on aarch64
    let aligned_sp = (stack_top as usize) & !0xF;

    let regs = &mut *regs;
    *regs = SavedRegs::default();
    regs.sp = aligned_sp as u64;
    regs.pc = thread_trampoline as usize as u64;
    regs.x19 = entry_fn as u64;
    regs.x20 = entry_arg as u64;
}

/// First-activation trampoline
///
/// Calls the entry shim with its argument, then funnels the returned
/// exit value into the exit path. Control never falls off the end.
#[unsafe(naked)]
unsafe extern "C" fn thread_trampoline() {
    naked_asm!(
        "mov x0, x20",
        "blr x19",
        // Exit value is already in x0
        "bl {finished}",
        "brk #0x1",
        finished = sym super::thread_finished,
    );
}

/// Perform a voluntary context switch
///
/// Saves callee-saved registers into `old_regs` and resumes the context
/// in `new_regs`. The resume address for the saved context is the
/// caller's return address, so the suspended thread continues right
/// after its call to this function.
///
/// # Safety
///
/// Both pointers must reference `SavedRegs` that stay valid until the
/// owning threads are reclaimed; `new_regs` must hold either a context
/// captured by this function or one built by `init_context`.
#[unsafe(naked)]
pub unsafe extern "C" fn context_switch(_old_regs: *mut SavedRegs, _new_regs: *const SavedRegs) {
    naked_asm!(
        // Save callee-saved state to old_regs (x0)
        "mov x9, sp",
        "str x9, [x0, #0x00]",
        "str lr, [x0, #0x08]",
        "stp x19, x20, [x0, #0x10]",
        "stp x21, x22, [x0, #0x20]",
        "stp x23, x24, [x0, #0x30]",
        "stp x25, x26, [x0, #0x40]",
        "stp x27, x28, [x0, #0x50]",
        "str x29, [x0, #0x60]",
        "stp d8, d9, [x0, #0x68]",
        "stp d10, d11, [x0, #0x78]",
        "stp d12, d13, [x0, #0x88]",
        "stp d14, d15, [x0, #0x98]",
        // Load callee-saved state from new_regs (x1)
        "ldr x9, [x1, #0x00]",
        "mov sp, x9",
        "ldp x19, x20, [x1, #0x10]",
        "ldp x21, x22, [x1, #0x20]",
        "ldp x23, x24, [x1, #0x30]",
        "ldp x25, x26, [x1, #0x40]",
        "ldp x27, x28, [x1, #0x50]",
        "ldr x29, [x1, #0x60]",
        "ldp d8, d9, [x1, #0x68]",
        "ldp d10, d11, [x1, #0x78]",
        "ldp d12, d13, [x1, #0x88]",
        "ldp d14, d15, [x1, #0x98]",
        // Jump to the new context's resume address
        "ldr x9, [x1, #0x08]",
        "br x9",
    );
}

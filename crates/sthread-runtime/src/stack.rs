//! Per-thread stack allocation
//!
//! Each logical thread owns one mmap'd stack with a PROT_NONE guard page
//! at the low end, so an overflow faults instead of corrupting the
//! neighbouring allocation. The mapping is released when the owning TCB
//! is reclaimed (after join).

use sthread_core::error::{SchedError, SchedResult};

/// An owned, mmap'd thread stack
pub struct ThreadStack {
    base: *mut u8,
    total_size: usize,
    guard_size: usize,
}

impl ThreadStack {
    /// Map a stack of at least `stack_size` usable bytes plus a guard page
    pub fn allocate(stack_size: usize) -> SchedResult<Self> {
        let page = page_size();
        let usable = round_up(stack_size.max(page), page);
        let guard_size = page;
        let total_size = usable + guard_size;

        let base = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                total_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if base == libc::MAP_FAILED {
            return Err(SchedError::ResourceExhausted);
        }
        let base = base as *mut u8;

        // Guard page at the low end; the stack grows down towards it
        let ret = unsafe { libc::mprotect(base as *mut libc::c_void, guard_size, libc::PROT_NONE) };
        if ret != 0 {
            unsafe {
                libc::munmap(base as *mut libc::c_void, total_size);
            }
            return Err(SchedError::ResourceExhausted);
        }

        Ok(Self {
            base,
            total_size,
            guard_size,
        })
    }

    /// High end of the usable stack region
    #[inline]
    pub fn top(&self) -> *mut u8 {
        unsafe { self.base.add(self.total_size) }
    }

    /// Usable bytes between guard page and top
    #[inline]
    pub fn usable_size(&self) -> usize {
        self.total_size - self.guard_size
    }
}

impl Drop for ThreadStack {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.base as *mut libc::c_void, self.total_size);
        }
    }
}

fn page_size() -> usize {
    let sz = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if sz <= 0 {
        4096
    } else {
        sz as usize
    }
}

fn round_up(value: usize, to: usize) -> usize {
    (value + to - 1) / to * to
}

//! In-memory stand-ins for the console and allocator boundaries.
//!
//! Used by the unit and integration tests, and handy for driving a
//! [`Kernel`](crate::Kernel) from a host program. Only built for tests or
//! with the `testing` feature.

use alloc::string::String;

use crate::boundary::{Console, PageAllocator, PageGrant};
use crate::error::{OutOfMemory, PageError};

/// Console that records everything written to it.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    output: String,
    clears: usize,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since the last clear.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Drain the captured output.
    pub fn take(&mut self) -> String {
        core::mem::take(&mut self.output)
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Console for MemoryConsole {
    fn write_str(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn clear_screen(&mut self) {
        self.output.clear();
        self.clears += 1;
    }
}

/// Deterministic bump allocator over a fake address window.
///
/// Physical addresses are the logical ones minus a fixed offset, mimicking an
/// identity-offset mapping.
#[derive(Debug, Clone)]
pub struct BumpPageAllocator {
    next: u64,
    end: u64,
    phys_offset: u64,
}

impl BumpPageAllocator {
    pub const DEFAULT_BASE: u64 = 0x4444_4444_0000;
    pub const DEFAULT_PHYS_OFFSET: u64 = 0x4444_0000_0000;

    /// A window of `capacity` bytes starting at [`Self::DEFAULT_BASE`].
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            next: Self::DEFAULT_BASE,
            end: Self::DEFAULT_BASE + capacity,
            phys_offset: Self::DEFAULT_PHYS_OFFSET,
        }
    }
}

impl Default for BumpPageAllocator {
    fn default() -> Self {
        Self::with_capacity(1 << 20)
    }
}

impl PageAllocator for BumpPageAllocator {
    fn allocate(&mut self, size: usize, align: usize) -> Result<PageGrant, PageError> {
        let oom = OutOfMemory { size, align };
        let align = align.max(1) as u64;
        let start = self.next.div_ceil(align) * align;
        let end = start.checked_add(size as u64).ok_or(oom)?;
        if end > self.end {
            return Err(oom.into());
        }
        self.next = end;
        Ok(PageGrant {
            logical: start,
            physical: start - self.phys_offset,
        })
    }
}

//! The narrow interfaces the core consumes from the rest of the kernel.

use crate::error::PageError;

/// Append-only text output.
pub trait Console {
    fn write_str(&mut self, s: &str);

    fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf));
    }

    fn clear_screen(&mut self);
}

/// A block handed out by the allocator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGrant {
    pub logical: u64,
    pub physical: u64,
}

/// Raw memory blocks for the `PAGE` command.
///
/// Blocks are never given back. Callers must not assume they are zeroed.
pub trait PageAllocator {
    fn allocate(&mut self, size: usize, align: usize) -> Result<PageGrant, PageError>;
}

use core::fmt;

use crate::fs::FileId;

/// The allocator boundary could not satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory {
    pub size: usize,
    pub align: usize,
}

impl fmt::Display for OutOfMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "out of memory ({} bytes, align {})", self.size, self.align)
    }
}

/// Why the allocator boundary refused a `PAGE` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    OutOfMemory(OutOfMemory),
    /// The block was handed out but the page table has no frame behind it.
    Unmapped { logical: u64 },
}

impl From<OutOfMemory> for PageError {
    fn from(err: OutOfMemory) -> Self {
        PageError::OutOfMemory(err)
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::OutOfMemory(err) => err.fmt(f),
            PageError::Unmapped { logical } => {
                write!(f, "block at {:#x} has no physical mapping", logical)
            }
        }
    }
}

/// Failures of the SSFS file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// A name or content buffer could not be reserved.
    OutOfMemory,
    /// The id does not name a user record of this table.
    NoSuchFile(FileId),
    /// A table image failed to decode or breaks the chain invariant.
    CorruptImage,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::OutOfMemory => f.write_str("out of memory"),
            FsError::NoSuchFile(id) => write!(f, "no such file #{}", id),
            FsError::CorruptImage => f.write_str("corrupt file table image"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    Fs(FsError),
    Page(PageError),
}

impl From<FsError> for KernelError {
    fn from(err: FsError) -> Self {
        KernelError::Fs(err)
    }
}

impl From<PageError> for KernelError {
    fn from(err: PageError) -> Self {
        KernelError::Page(err)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Fs(err) => write!(f, "file store: {}", err),
            KernelError::Page(err) => write!(f, "allocator: {}", err),
        }
    }
}

//! SSFS, the simple sequential file store.
//!
//! Records live in an arena and are chained in creation order through
//! `next` indices, starting at the `ROOT` sentinel in slot 0.

pub mod file;
pub mod image;
pub mod storage;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use file::FileRecord;
pub use storage::{FileTable, Listing, ROOT_NAME};

/// Stable index of a record in the file table arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(usize);

impl FileId {
    /// The root sentinel. Never handed out as a user file.
    pub const ROOT: FileId = FileId(0);

    pub(crate) fn new(index: usize) -> Self {
        FileId(index)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

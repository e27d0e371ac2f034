use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::FileId;
use crate::error::FsError;

/// One entry of the SSFS chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    name: String,
    content: Vec<u8>, // empty until the first write
    next: Option<FileId>,
}

impl FileRecord {
    pub(crate) fn new(name: &str) -> Result<Self, FsError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(name.len())
            .map_err(|_| FsError::OutOfMemory)?;
        owned.push_str(name);

        Ok(Self {
            name: owned,
            content: Vec::new(),
            next: None,
        })
    }

    pub(crate) fn sentinel(name: &str) -> Self {
        Self {
            name: String::from(name),
            content: Vec::new(),
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn next(&self) -> Option<FileId> {
        self.next
    }

    pub(crate) fn link(&mut self, next: FileId) {
        self.next = Some(next);
    }

    /// Replace the whole content with a fresh buffer holding `data`.
    ///
    /// The new buffer is reserved before the old one is dropped, so a failed
    /// reservation leaves the record untouched.
    pub(crate) fn replace(&mut self, data: &[u8]) -> Result<(), FsError> {
        let mut fresh = Vec::new();
        fresh
            .try_reserve_exact(data.len())
            .map_err(|_| FsError::OutOfMemory)?;
        fresh.extend_from_slice(data);
        self.content = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_reads_empty() {
        let rec = FileRecord::new("notes").unwrap();
        assert_eq!(rec.name(), "notes");
        assert!(rec.content().is_empty());
        assert_eq!(rec.size(), 0);
        assert_eq!(rec.next(), None);
    }

    #[test]
    fn replace_overwrites_instead_of_appending() {
        let mut rec = FileRecord::new("f").unwrap();
        rec.replace(b"first payload").unwrap();
        rec.replace(b"2nd").unwrap();
        assert_eq!(rec.content(), b"2nd");
        assert_eq!(rec.size(), 3);
    }
}

use alloc::vec;
use alloc::vec::Vec;

use super::{FileId, FileRecord};
use crate::error::FsError;

pub const ROOT_NAME: &str = "ROOT";

/// The SSFS file table: an arena of records linked from the root sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    pub(super) records: Vec<FileRecord>,
}

impl FileTable {
    /// Allocate the root sentinel. Every table starts here.
    pub fn init() -> Self {
        Self {
            records: vec![FileRecord::sentinel(ROOT_NAME)],
        }
    }

    /// Append a new, empty record named `name` to the tail of the chain.
    ///
    /// Names are not unique; creating the same name twice yields two records.
    pub fn create(&mut self, name: &str) -> Result<FileId, FsError> {
        let tail = self.last_file();
        let record = FileRecord::new(name)?;
        self.records
            .try_reserve(1)
            .map_err(|_| FsError::OutOfMemory)?;

        let id = FileId::new(self.records.len());
        self.records.push(record);
        self.records[tail.value()].link(id);

        log::debug!("ssfs: created file #{} ({} bytes of name)", id, name.len());
        Ok(id)
    }

    /// First record in creation order whose name equals `name` byte for byte.
    pub fn find(&self, name: &str) -> Option<FileId> {
        self.chain()
            .find(|(_, record)| record.name() == name)
            .map(|(id, _)| id)
    }

    /// Lookup that creates the file on a miss.
    pub fn open_or_create(&mut self, name: &str) -> Result<FileId, FsError> {
        match self.find(name) {
            Some(id) => Ok(id),
            None => self.create(name),
        }
    }

    /// Replace the whole content of `id` with `payload`.
    pub fn write(&mut self, id: FileId, payload: &[u8]) -> Result<(), FsError> {
        let record = self.user_record_mut(id)?;
        record.replace(payload)?;
        log::debug!("ssfs: wrote {} bytes to file #{}", payload.len(), id);
        Ok(())
    }

    /// Current content of `id`; empty if it was never written.
    pub fn read(&self, id: FileId) -> Result<&[u8], FsError> {
        self.get(id)
            .map(FileRecord::content)
            .ok_or(FsError::NoSuchFile(id))
    }

    /// Look up a user record. The root sentinel is never returned.
    pub fn get(&self, id: FileId) -> Option<&FileRecord> {
        if id == FileId::ROOT {
            return None;
        }
        self.records.get(id.value())
    }

    /// Filenames in creation order, plus how many there are.
    pub fn list(&self) -> (Listing<'_>, usize) {
        (self.names(), self.len())
    }

    /// A restartable iterator over filenames in creation order.
    pub fn names(&self) -> Listing<'_> {
        Listing {
            chain: self.chain(),
            remaining: self.len(),
        }
    }

    /// Number of user records (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.records.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the chain from the root, skipping the sentinel.
    pub(super) fn chain(&self) -> Chain<'_> {
        Chain {
            table: self,
            cursor: self.records[FileId::ROOT.value()].next(),
        }
    }

    fn last_file(&self) -> FileId {
        self.chain().last().map_or(FileId::ROOT, |(id, _)| id)
    }

    fn user_record_mut(&mut self, id: FileId) -> Result<&mut FileRecord, FsError> {
        if id == FileId::ROOT {
            return Err(FsError::NoSuchFile(id));
        }
        self.records
            .get_mut(id.value())
            .ok_or(FsError::NoSuchFile(id))
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::init()
    }
}

/// Records reachable from the root, in chain order.
#[derive(Clone)]
pub(crate) struct Chain<'a> {
    table: &'a FileTable,
    cursor: Option<FileId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (FileId, &'a FileRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let record = self.table.records.get(id.value())?;
        self.cursor = record.next();
        Some((id, record))
    }
}

/// Filenames of a [`FileTable`] in creation order.
///
/// Cloning the listing restarts it from wherever the clone was taken.
#[derive(Clone)]
pub struct Listing<'a> {
    chain: Chain<'a>,
    remaining: usize,
}

impl<'a> Iterator for Listing<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, record) = self.chain.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(record.name())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Listing<'_> {}

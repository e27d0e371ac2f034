//! In-memory byte image of a file table.
//!
//! Layout: `[MAGIC u32 LE][postcard(records)]`. Images are only ever held in
//! memory; nothing here touches a disk.

use alloc::vec;
use alloc::vec::Vec;

use super::{FileId, FileRecord, FileTable, ROOT_NAME};
use crate::error::FsError;

const MAGIC: u32 = 0x53_53_46_31; // 'SSF1'

impl FileTable {
    /// Encode every record, sentinel included, with its `next` link.
    pub fn to_image(&self) -> Result<Vec<u8>, FsError> {
        let mut image = Vec::new();
        image
            .try_reserve(4)
            .map_err(|_| FsError::OutOfMemory)?;
        image.extend_from_slice(&MAGIC.to_le_bytes());

        let body = postcard::to_allocvec(&self.records).map_err(|_| FsError::OutOfMemory)?;
        image
            .try_reserve_exact(body.len())
            .map_err(|_| FsError::OutOfMemory)?;
        image.extend_from_slice(&body);
        Ok(image)
    }

    /// Decode an image produced by [`FileTable::to_image`].
    ///
    /// The chain must start at a `ROOT` sentinel with no content and reach
    /// every record exactly once.
    pub fn from_image(bytes: &[u8]) -> Result<Self, FsError> {
        if bytes.len() < 4 {
            return Err(FsError::CorruptImage);
        }
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC {
            return Err(FsError::CorruptImage);
        }

        let records: Vec<FileRecord> =
            postcard::from_bytes(&bytes[4..]).map_err(|_| FsError::CorruptImage)?;
        check_chain(&records)?;
        Ok(Self { records })
    }
}

fn check_chain(records: &[FileRecord]) -> Result<(), FsError> {
    let root = records.first().ok_or(FsError::CorruptImage)?;
    if root.name() != ROOT_NAME || root.size() != 0 {
        return Err(FsError::CorruptImage);
    }

    let mut seen = vec![false; records.len()];
    seen[FileId::ROOT.value()] = true;
    let mut reached = 1;
    let mut cursor = root.next();
    while let Some(id) = cursor {
        let slot = seen.get_mut(id.value()).ok_or(FsError::CorruptImage)?;
        if *slot {
            // cycle, or a record linked twice
            return Err(FsError::CorruptImage);
        }
        *slot = true;
        reached += 1;
        cursor = records[id.value()].next();
    }

    if reached != records.len() {
        return Err(FsError::CorruptImage);
    }
    Ok(())
}

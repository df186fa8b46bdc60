//! Memory-mapped file backend.
//!
//! The mapping is read-only and never executable; the module's code is not run and its
//! initializers are not triggered. The mapping, and with it the file handle, lives exactly as
//! long as the owning [`crate::file::File`].

use super::Backend;
use crate::{
    Error::{Empty, FileError, OutOfBounds},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A read-only memory mapping of a file on disk.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Opens and maps the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty file and [`crate::Error::FileError`] if the
    /// file cannot be opened or mapped. The
    /// [`std::io::ErrorKind`] is preserved so callers can tell a missing file from a permission
    /// failure.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path).map_err(FileError)?;
        if file.metadata().map_err(FileError)?.len() == 0 {
            return Err(Empty);
        }

        // SAFETY: mapped read-only; the file must not be truncated while the mapping is alive.
        let mmap = unsafe { Mmap::map(&file) }.map_err(FileError)?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

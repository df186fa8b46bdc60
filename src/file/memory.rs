//! In-memory backend for images that are already loaded.
//!
//! Used by [`crate::scope::FileDispenser::open_bytes`] and by the buffered
//! [`crate::scope::Backing`] mode, where the module is read into a `Vec<u8>` up front and the
//! file handle is released immediately.

use super::Backend;
use crate::{Error::OutOfBounds, Result};

/// An owned byte buffer implementing [`Backend`].
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Wraps `data` without copying.
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
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
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

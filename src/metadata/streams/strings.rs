//! The `#Strings` heap (ECMA-335 II.24.2.3).
//!
//! NUL-terminated UTF-8 identifiers addressed by byte offset. Index 0 is the empty string.

use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// A view over the `#Strings` heap.
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wraps the heap bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap does not start with the empty string.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Returns the string starting at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] past the end of the heap and
    /// [`crate::Error::Malformed`] for an unterminated or non-UTF-8 entry.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }

    /// Copies the string at `index` into `buffer` and returns its length in bytes.
    ///
    /// Nothing is written unless `buffer` can hold the whole string, so a zero-capacity buffer
    /// probes for the required size. The terminator is not copied.
    ///
    /// # Errors
    /// Same as [`Strings::get`].
    pub fn copy_into(&self, index: usize, buffer: &mut [u8]) -> Result<usize> {
        let value = self.get(index)?;
        let required = value.len();

        if buffer.len() >= required {
            buffer[..required].copy_from_slice(value.as_bytes());
        }

        Ok(required)
    }

    /// Heap size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap holds only the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() <= 1
    }
}

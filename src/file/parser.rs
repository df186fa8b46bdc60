//! Cursor-based reader for metadata structures.
//!
//! [`Parser`] wraps a byte slice and a position. It complements the free functions in
//! [`crate::file::io`] with the ECMA-335 compressed integer encoding (II.23.2) and
//! NUL-terminated names, which stream headers and blob entries use.

use crate::{file::io::CilIO, Error::OutOfBounds, Result};

/// A forward-only reader over a byte slice.
///
/// ```rust,ignore
/// let mut parser = Parser::new(&[0x81, 0x80, 0xAA]);
/// assert_eq!(parser.read_compressed_uint()?, 0x0180);
/// assert_eq!(parser.read_le::<u8>()?, 0xAA);
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying slice.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Bytes left after the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Moves to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies past the end.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Skips `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if that would pass the end.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let Some(target) = self.position.checked_add(step) else {
            return Err(OutOfBounds);
        };

        self.seek(target)
    }

    /// Advances to the next multiple of `alignment`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the aligned position lies past the end.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - (self.position % alignment)) % alignment;
        self.advance_by(padding)
    }

    /// Reads a little-endian value.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the value does not fit.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        crate::file::io::read_le_at(self.data, &mut self.position)
    }

    /// Reads an ECMA-335 compressed unsigned integer (1, 2 or 4 bytes).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncated input, or [`crate::Error::Malformed`]
    /// when the lead byte does not start a valid encoding.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Borrows the next `length` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(length) else {
            return Err(OutOfBounds);
        };

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads a NUL-terminated UTF-8 string and consumes the terminator.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no terminator is found, or
    /// [`crate::Error::Malformed`] for invalid UTF-8.
    pub fn read_string_utf8(&mut self) -> Result<&'a str> {
        let rest = &self.data[self.position.min(self.data.len())..];
        let Some(length) = rest.iter().position(|byte| *byte == 0) else {
            return Err(OutOfBounds);
        };

        let bytes = self.read_bytes(length)?;
        self.advance_by(1)?;

        std::str::from_utf8(bytes)
            .map_err(|_| malformed_error!("Invalid UTF-8 string at offset - {}", self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_uint() {
        // ECMA-335 II.23.2 reference encodings
        let test_cases = vec![
            (vec![0x03], 0x03),
            (vec![0x7F], 0x7F),
            (vec![0x80, 0x80], 0x80),
            (vec![0xAE, 0x57], 0x2E57),
            (vec![0xBF, 0xFF], 0x3FFF),
            (vec![0xC0, 0x00, 0x40, 0x00], 0x4000),
            (vec![0xDF, 0xFF, 0xFF, 0xFF], 0x1FFF_FFFF),
        ];

        for (input, expected) in test_cases {
            let mut parser = Parser::new(&input);
            assert_eq!(parser.read_compressed_uint().unwrap(), expected);
            assert_eq!(parser.remaining(), 0);
        }
    }

    #[test]
    fn compressed_uint_invalid() {
        let mut parser = Parser::new(&[0xFF, 0x00, 0x00, 0x00]);
        assert!(matches!(
            parser.read_compressed_uint(),
            Err(crate::Error::Malformed { .. })
        ));

        let mut parser = Parser::new(&[0xC0, 0x00]);
        assert!(matches!(parser.read_compressed_uint(), Err(OutOfBounds)));
    }

    #[test]
    fn strings_and_alignment() {
        let data = b"#~\0\0#Strings\0\0\0\0";
        let mut parser = Parser::new(data);

        assert_eq!(parser.read_string_utf8().unwrap(), "#~");
        parser.align(4).unwrap();
        assert_eq!(parser.pos(), 4);
        assert_eq!(parser.read_string_utf8().unwrap(), "#Strings");
        parser.align(4).unwrap();
        assert_eq!(parser.pos(), 16);
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn bounds() {
        let mut parser = Parser::new(&[0x01, 0x02]);
        assert!(parser.read_bytes(3).is_err());
        assert!(parser.seek(3).is_err());
        assert_eq!(parser.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert!(parser.read_le::<u8>().is_err());

        let mut parser = Parser::new(b"abc");
        assert!(matches!(parser.read_string_utf8(), Err(OutOfBounds)));
    }
}

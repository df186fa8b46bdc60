//! Stream headers of the metadata root (ECMA-335 II.24.2.2).

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Names a stream header may carry.
const KNOWN_STREAMS: [&str; 8] = ["#~", "#-", "#Strings", "#US", "#Blob", "#GUID", "#Pdb", "#JTD"];

/// Location and name of one metadata stream, relative to the metadata root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset from the start of the metadata root
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
    /// Stream name, e.g. `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Reads one stream header from `parser` and leaves it at the next 4-byte boundary.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncated input and [`crate::Error::Malformed`]
    /// for names that are not metadata streams or exceed 32 bytes.
    pub fn read(parser: &mut Parser<'_>) -> Result<StreamHeader> {
        let start = parser.pos();
        let offset = parser.read_le::<u32>()?;
        let size = parser.read_le::<u32>()?;
        let name = parser.read_string_utf8()?;

        if name.len() > 32 {
            return Err(malformed_error!("Stream header name too long - {}", name));
        }

        if !KNOWN_STREAMS.contains(&name) {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        parser.seek(start)?;
        parser.advance_by(8 + (name.len() + 1).div_ceil(4) * 4)?;

        Ok(StreamHeader {
            offset,
            size,
            name: name.to_string(),
        })
    }

    /// Returns the stream bytes within `root`, the metadata region the offset is relative to.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the stream does not fit inside `root`.
    pub fn slice<'a>(&self, root: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        let Some(end) = start.checked_add(self.size as usize) else {
            return Err(OutOfBounds);
        };

        root.get(start..end).ok_or(OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,
            0x10, 0x46, 0x00, 0x00,
        ];

        let mut parser = Parser::new(&header_bytes);
        let parsed_header = StreamHeader::read(&mut parser).unwrap();

        assert_eq!(parsed_header.offset, 0x6C);
        assert_eq!(parsed_header.size, 0x45A4);
        assert_eq!(parsed_header.name, "#~");
        assert_eq!(parser.pos(), 12);
    }

    #[test]
    fn crafted_invalid() {
        #[rustfmt::skip]
        let header_bytes = [
            0x6C, 0x00, 0x00, 0x00,
            0xA4, 0x45, 0x00, 0x00,
            0x24, 0x7E, 0x00, 0x00,
        ];

        assert!(StreamHeader::read(&mut Parser::new(&header_bytes)).is_err());
    }

    #[test]
    fn slice() {
        let header = StreamHeader {
            offset: 2,
            size: 3,
            name: "#Blob".to_string(),
        };

        assert_eq!(header.slice(&[0, 1, 2, 3, 4, 5]).unwrap(), &[2, 3, 4]);
        assert!(header.slice(&[0, 1, 2, 3]).is_err());
    }
}

//! The metadata root (ECMA-335 II.24.2.1).
//!
//! Begins with the `BSJB` signature, followed by a padded runtime version string and the stream
//! header directory.

use crate::{
    file::parser::Parser,
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// `BSJB`
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The parsed metadata root and its stream directory.
#[derive(Debug, Clone)]
pub struct Root {
    /// Always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Padded length of the version string
    pub length: u32,
    /// Runtime version the module was built against, e.g. `v4.0.30319`
    pub version: String,
    /// Reserved, 0
    pub flags: u16,
    /// Stream headers in directory order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parses the root at the start of the metadata region `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a bad signature, an unreasonable version length,
    /// a stream count outside `1..=8`, duplicate streams, or a stream reaching past `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 36 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let signature = parser.read_le::<u32>()?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {:#x}",
                signature
            ));
        }

        let major_version = parser.read_le::<u16>()?;
        let minor_version = parser.read_le::<u16>()?;
        let _reserved = parser.read_le::<u32>()?;

        let length = parser.read_le::<u32>()?;
        if length > 255 {
            return Err(malformed_error!("Version string too long - {}", length));
        }

        let version_bytes = parser.read_bytes(length as usize)?;
        let version = String::from_utf8_lossy(version_bytes)
            .trim_end_matches('\0')
            .to_string();

        let flags = parser.read_le::<u16>()?;
        let stream_count = parser.read_le::<u16>()?;
        if stream_count == 0 || stream_count > 8 {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut stream_headers: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            let header = StreamHeader::read(&mut parser)?;

            if header.slice(data).is_err() {
                return Err(malformed_error!(
                    "Stream {} exceeds metadata - {} + {}",
                    header.name,
                    header.offset,
                    header.size
                ));
            }

            if stream_headers.iter().any(|seen| seen.name == header.name) {
                return Err(malformed_error!("Duplicate stream - {}", header.name));
            }

            stream_headers.push(header);
        }

        Ok(Root {
            signature,
            major_version,
            minor_version,
            length,
            version,
            flags,
            stream_headers,
        })
    }

    /// Finds a stream header by name.
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const ROOT: [u8; 60] = [
        0x42, 0x53, 0x4A, 0x42,                         // signature
        0x01, 0x00,                                     // major_version
        0x01, 0x00,                                     // minor_version
        0x00, 0x00, 0x00, 0x00,                         // reserved
        0x0C, 0x00, 0x00, 0x00,                         // length
        b'v', b'4', b'.', b'0', b'.', b'3', b'0', b'3', b'1', b'9', 0x00, 0x00,
        0x00, 0x00,                                     // flags
        0x02, 0x00,                                     // streams
        0x34, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, b'#', b'~', 0x00, 0x00,
        0x3C, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, b'#', b'G', b'U', b'I', b'D', 0x00, 0x00, 0x00,
    ];

    #[test]
    fn crafted() {
        let mut data = ROOT.to_vec();
        data.extend_from_slice(&[0_u8; 8]);

        let root = Root::read(&data).unwrap();

        assert_eq!(root.signature, CIL_HEADER_MAGIC);
        assert_eq!(root.major_version, 1);
        assert_eq!(root.length, 12);
        assert_eq!(root.version, "v4.0.30319");
        assert_eq!(root.stream_headers.len(), 2);
        assert_eq!(root.stream("#~").unwrap().offset, 0x34);
        assert_eq!(root.stream("#GUID").unwrap().size, 4);
        assert!(root.stream("#Blob").is_none());
    }

    #[test]
    fn stream_past_end() {
        let root = Root::read(&ROOT);
        assert!(matches!(root, Err(crate::Error::Malformed { .. })));
    }

    #[test]
    fn bad_signature() {
        let mut data = ROOT.to_vec();
        data[0] = 0x43;
        data.extend_from_slice(&[0_u8; 8]);

        assert!(matches!(
            Root::read(&data),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn duplicate_stream() {
        let mut data = ROOT.to_vec();
        data[52..56].copy_from_slice(&[b'#', b'~', 0x00, 0x00]);
        data.extend_from_slice(&[0_u8; 8]);

        assert!(Root::read(&data).is_err());
    }
}

//! The CLI header (ECMA-335 II.25.3.3).
//!
//! Located through the PE's CLR runtime header data directory. Of its fields only the metadata
//! directory is needed to reach the manifest; the rest is kept for callers that want to report
//! runtime version or strong-name signature presence.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The 72-byte CLI header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Size of the header, always 72
    pub cb: u32,
    /// Minimum runtime major version
    pub major_runtime_version: u16,
    /// Minimum runtime minor version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata region
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*`
    pub flags: u32,
    /// Entry point token or native RVA
    pub entry_point_token: u32,
    /// RVA of managed resources
    pub resource_rva: u32,
    /// Size of managed resources
    pub resource_size: u32,
    /// RVA of the strong name signature
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature
    pub strong_name_signature_size: u32,
}

impl Cor20Header {
    /// `COMIMAGE_FLAGS_STRONGNAMESIGNED`
    pub const FLAG_STRONG_NAME_SIGNED: u32 = 0x0000_0008;

    /// Reads and validates a CLI header.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for fewer than 72 bytes, and
    /// [`crate::Error::Malformed`] for a wrong `cb` or an empty metadata directory.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < 72 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(malformed_error!("Metadata directory is empty"));
        }

        let flags = parser.read_le::<u32>()?;
        let entry_point_token = parser.read_le::<u32>()?;
        let resource_rva = parser.read_le::<u32>()?;
        let resource_size = parser.read_le::<u32>()?;
        let strong_name_signature_rva = parser.read_le::<u32>()?;
        let strong_name_signature_size = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
            resource_rva,
            resource_size,
            strong_name_signature_rva,
            strong_name_signature_size,
        })
    }

    /// Returns `true` if the image claims a strong name signature.
    #[must_use]
    pub fn is_strong_name_signed(&self) -> bool {
        self.flags & Self::FLAG_STRONG_NAME_SIGNED != 0
    }
}

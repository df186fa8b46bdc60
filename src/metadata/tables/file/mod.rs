//! The `File` table (0x26): other files that make up a multi-file assembly.

mod raw;
mod reader;

pub use raw::*;

use bitflags::bitflags;

bitflags! {
    /// `FileAttributes` (ECMA-335 II.23.1.6).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileAttributes: u32 {
        /// The file is a resource or other non-metadata file
        const CONTAINS_NO_METADATA = 0x0001;
    }
}

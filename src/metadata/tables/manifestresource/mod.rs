//! The `ManifestResource` table (0x28): named resources of the assembly.

mod raw;
mod reader;

pub use raw::*;

use bitflags::bitflags;

bitflags! {
    /// `ManifestResourceAttributes` (ECMA-335 II.23.1.9).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ManifestResourceAttributes: u32 {
        /// Exported from the assembly
        const PUBLIC = 0x0001;
        /// Private to the assembly
        const PRIVATE = 0x0002;
    }
}

impl ManifestResourceAttributes {
    /// Visibility mask
    pub const VISIBILITY_MASK: u32 = 0x0007;
}

use crate::metadata::token::Token;

/// One undecoded `Assembly` row; heap columns hold indexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// `AssemblyHashAlgorithm` id
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags` bits
    pub flags: u32,
    /// `#Blob` index of the public key; 0 when unsigned
    pub public_key: u32,
    /// `#Strings` index of the simple name
    pub name: u32,
    /// `#Strings` index of the culture; 0 when neutral
    pub culture: u32,
}

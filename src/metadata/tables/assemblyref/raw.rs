use crate::metadata::token::Token;

/// One undecoded `AssemblyRef` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyRefRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags` bits; `PUBLIC_KEY` tells key from token
    pub flags: u32,
    /// `#Blob` index of the public key or its 8-byte token
    pub public_key_or_token: u32,
    /// `#Strings` index of the simple name
    pub name: u32,
    /// `#Strings` index of the culture
    pub culture: u32,
    /// `#Blob` index of the referenced assembly's hash
    pub hash_value: u32,
}

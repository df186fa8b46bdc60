use crate::metadata::{tables::CodedIndex, token::Token};

/// One `ManifestResource` row, with its `Implementation` coded index already split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestResourceRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// Offset of the resource inside the module's resource section (embedded resources only)
    pub offset_field: u32,
    /// `ManifestResourceAttributes` bits
    pub flags: u32,
    /// `#Strings` index of the resource name
    pub name: u32,
    /// Nil for an embedded resource; otherwise a `File` or `AssemblyRef`
    pub implementation: CodedIndex,
}

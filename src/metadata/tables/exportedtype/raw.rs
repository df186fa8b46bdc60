use crate::metadata::{tables::CodedIndex, token::Token};

/// One `ExportedType` row, with its `Implementation` coded index already split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedTypeRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// `TypeAttributes` bits
    pub flags: u32,
    /// Hint: the `TypeDef` row id in the module that defines the type
    pub type_def_id: u32,
    /// `#Strings` index of the type name
    pub name: u32,
    /// `#Strings` index of the namespace
    pub namespace: u32,
    /// Where the type lives: a `File`, an `AssemblyRef`, or the enclosing `ExportedType`
    pub implementation: CodedIndex,
}

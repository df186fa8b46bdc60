use crate::metadata::token::Token;

/// One undecoded `File` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// `FileAttributes` bits
    pub flags: u32,
    /// `#Strings` index of the file name
    pub name: u32,
    /// `#Blob` index of the file's hash
    pub hash_value: u32,
}

//! Metadata streams (ECMA-335 II.24.2.2).
//!
//! The metadata root lists a handful of named streams. An inspector needs three of them:
//!
//! - **`#~`** the tables, see [`TablesHeader`]
//! - **`#Strings`** NUL-terminated UTF-8 names, see [`Strings`]
//! - **`#Blob`** length-prefixed binary values such as public keys and hashes, see [`Blob`]
//!
//! `#US`, `#GUID` and the portable PDB streams are recognised in the stream directory but not
//! decoded.

mod blob;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;

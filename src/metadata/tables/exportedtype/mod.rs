//! The `ExportedType` table (0x27): types defined in other modules of the assembly, or
//! forwarded to other assemblies.

mod raw;
mod reader;

pub use raw::*;

//! The `AssemblyRef` table (0x23): assemblies this module depends on.

mod raw;
mod reader;

pub use raw::*;

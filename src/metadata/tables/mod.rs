//! Metadata tables (ECMA-335 II.22).
//!
//! Only the manifest tables an assembly inspector needs are decoded into rows: `Assembly`,
//! `AssemblyRef`, `File`, `ExportedType` and `ManifestResource`. Every other table is still
//! sized through [`TableInfo::row_size`] so that the tables after it can be located.
//!
//! Rows are read lazily and by value. Heap columns stay as raw indexes; resolving them is up to
//! the caller, which holds the heaps.

mod assembly;
mod assemblyref;
mod exportedtype;
mod file;
mod manifestresource;
mod types;

pub use assembly::{AssemblyFlags, AssemblyRaw};
pub use assemblyref::AssemblyRefRaw;
pub use exportedtype::ExportedTypeRaw;
pub use file::{FileAttributes, FileRaw};
pub use manifestresource::{ManifestResourceAttributes, ManifestResourceRaw};
pub use types::{
    CodedIndex, CodedIndexType, MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef,
    TableIterator, TableRowInfo,
};

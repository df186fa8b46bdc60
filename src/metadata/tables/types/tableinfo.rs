//! Row counts and index widths of the tables stream.
//!
//! Every column that references a heap, another table or a coded index is 2 or 4 bytes wide
//! depending on the heap-size flags and the row counts of the referenced tables. [`TableInfo`]
//! derives those widths once per module and computes the row size of every table, which is how
//! the start of each table inside the stream is found.

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::types::{CodedIndexType, TableId},
    Result,
};

/// Row count and index width for one table.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to address every row
    pub bits: u8,
    /// Whether a plain index into this table is 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Derives index widths for a table with `rows` rows.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Index widths for one module's tables stream.
#[derive(Clone, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared handle to a [`TableInfo`].
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Reads the row counts that follow the 24-byte tables stream header.
    ///
    /// `data` is the tables stream from its start, `valid_bitvec` the mask of present tables.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `valid_bitvec` names an undefined table, and
    /// [`crate::Error::OutOfBounds`] if the row counts are truncated.
    pub fn new(data: &[u8], valid_bitvec: u64, heap_sizes: u8) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); TableId::SLOTS];
        let mut next_row_offset = 24;

        for bit in 0..64_u8 {
            if valid_bitvec & (1 << bit) == 0 {
                continue;
            }

            let Some(table_id) = TableId::from_id(bit) else {
                return Err(malformed_error!("Unknown table present in #~ - 0x{:02x}", bit));
            };

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            rows[table_id as usize] = TableRowInfo::new(row_count);
        }

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_sizes & 0x01 == 0x01,
            is_large_index_guid: heap_sizes & 0x02 == 0x02,
            is_large_index_blob: heap_sizes & 0x04 == 0x04,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Construct a `TableInfo` for unit tests from explicit row counts and heap-size flags.
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::SLOTS],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Row count of `table`; 0 when absent.
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize].rows
    }

    /// Width information for `table`.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Whether `#Strings` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Whether `#GUID` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Whether `#Blob` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index.
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index.
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index.
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a plain index into `table_id`.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Whether a coded index of family `coded_index_type` is 4 bytes wide.
    #[must_use]
    pub fn is_large_coded(&self, coded_index_type: CodedIndexType) -> bool {
        self.coded_indexes[coded_index_type as usize] > 16
    }

    /// Width of a coded index of family `coded_index_type`.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.is_large_coded(coded_index_type) {
            4
        } else {
            2
        }
    }

    /// Size in bytes of one row of `table` under this module's index widths.
    #[must_use]
    #[rustfmt::skip]
    pub fn row_size(&self, table: TableId) -> u32 {
        let s = self.str_bytes();
        let g = self.guid_bytes();
        let b = self.blob_bytes();
        let t = |table: TableId| self.table_index_bytes(table);
        let c = |coded: CodedIndexType| self.coded_index_bytes(coded);

        let size: u8 = match table {
            TableId::Module =>                 2 + s + g + g + g,
            TableId::TypeRef =>                c(CodedIndexType::ResolutionScope) + s + s,
            TableId::TypeDef =>                4 + s + s + c(CodedIndexType::TypeDefOrRef) + t(TableId::Field) + t(TableId::MethodDef),
            TableId::FieldPtr =>               t(TableId::Field),
            TableId::Field =>                  2 + s + b,
            TableId::MethodPtr =>              t(TableId::MethodDef),
            TableId::MethodDef =>              4 + 2 + 2 + s + b + t(TableId::Param),
            TableId::ParamPtr =>               t(TableId::Param),
            TableId::Param =>                  2 + 2 + s,
            TableId::InterfaceImpl =>          t(TableId::TypeDef) + c(CodedIndexType::TypeDefOrRef),
            TableId::MemberRef =>              c(CodedIndexType::MemberRefParent) + s + b,
            TableId::Constant =>               1 + 1 + c(CodedIndexType::HasConstant) + b,
            TableId::CustomAttribute =>        c(CodedIndexType::HasCustomAttribute) + c(CodedIndexType::CustomAttributeType) + b,
            TableId::FieldMarshal =>           c(CodedIndexType::HasFieldMarshal) + b,
            TableId::DeclSecurity =>           2 + c(CodedIndexType::HasDeclSecurity) + b,
            TableId::ClassLayout =>            2 + 4 + t(TableId::TypeDef),
            TableId::FieldLayout =>            4 + t(TableId::Field),
            TableId::StandAloneSig =>          b,
            TableId::EventMap =>               t(TableId::TypeDef) + t(TableId::Event),
            TableId::EventPtr =>               t(TableId::Event),
            TableId::Event =>                  2 + s + c(CodedIndexType::TypeDefOrRef),
            TableId::PropertyMap =>            t(TableId::TypeDef) + t(TableId::Property),
            TableId::PropertyPtr =>            t(TableId::Property),
            TableId::Property =>               2 + s + b,
            TableId::MethodSemantics =>        2 + t(TableId::MethodDef) + c(CodedIndexType::HasSemantics),
            TableId::MethodImpl =>             t(TableId::TypeDef) + c(CodedIndexType::MethodDefOrRef) + c(CodedIndexType::MethodDefOrRef),
            TableId::ModuleRef =>              s,
            TableId::TypeSpec =>               b,
            TableId::ImplMap =>                2 + c(CodedIndexType::MemberForwarded) + s + t(TableId::ModuleRef),
            TableId::FieldRVA =>               4 + t(TableId::Field),
            TableId::EncLog =>                 4 + 4,
            TableId::EncMap =>                 4,
            TableId::Assembly =>               4 + 2 + 2 + 2 + 2 + 4 + b + s + s,
            TableId::AssemblyProcessor =>      4,
            TableId::AssemblyOS =>             4 + 4 + 4,
            TableId::AssemblyRef =>            2 + 2 + 2 + 2 + 4 + b + s + s + b,
            TableId::AssemblyRefProcessor =>   4 + t(TableId::AssemblyRef),
            TableId::AssemblyRefOS =>          4 + 4 + 4 + t(TableId::AssemblyRef),
            TableId::File =>                   4 + s + b,
            TableId::ExportedType =>           4 + 4 + s + s + c(CodedIndexType::Implementation),
            TableId::ManifestResource =>       4 + 4 + s + c(CodedIndexType::Implementation),
            TableId::NestedClass =>            t(TableId::TypeDef) + t(TableId::TypeDef),
            TableId::GenericParam =>           2 + 2 + c(CodedIndexType::TypeOrMethodDef) + s,
            TableId::MethodSpec =>             c(CodedIndexType::MethodDefOrRef) + b,
            TableId::GenericParamConstraint => t(TableId::GenericParam) + c(CodedIndexType::TypeDefOrRef),
            TableId::Document =>               b + g + b + g,
            TableId::MethodDebugInformation => t(TableId::Document) + b,
            TableId::LocalScope =>             t(TableId::MethodDef) + t(TableId::ImportScope) + t(TableId::LocalVariable) + t(TableId::LocalConstant) + 4 + 4,
            TableId::LocalVariable =>          2 + 2 + s,
            TableId::LocalConstant =>          s + b,
            TableId::ImportScope =>            t(TableId::ImportScope) + b,
            TableId::StateMachineMethod =>     t(TableId::MethodDef) + t(TableId::MethodDef),
            TableId::CustomDebugInformation => c(CodedIndexType::HasCustomDebugInformation) + g + b,
        };

        u32::from(size)
    }

    fn calculate_coded_index_size(&self, coded_index_type: CodedIndexType) -> u8 {
        let max_bits = coded_index_type
            .tables()
            .iter()
            .map(|table| self.rows[*table as usize].bits)
            .max()
            .unwrap_or(1);

        max_bits + coded_index_type.tag_bits()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let size = self.calculate_coded_index_size(coded_index);
            self.coded_indexes[coded_index as usize] = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_info() {
        assert_eq!(TableRowInfo::new(0).bits, 1);
        assert_eq!(TableRowInfo::new(1).bits, 1);
        assert_eq!(TableRowInfo::new(0xFFFF).bits, 16);
        assert!(!TableRowInfo::new(0xFFFF).is_large);
        assert_eq!(TableRowInfo::new(0x10000).bits, 17);
        assert!(TableRowInfo::new(0x10000).is_large);
    }

    #[test]
    fn parse_row_counts() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00,                         // reserved
            0x02, 0x00,                                     // major / minor
            0x05,                                           // heap_sizes
            0x01,                                           // reserved
            0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // valid
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00,                         // Module
            0x07, 0x00, 0x00, 0x00,                         // TypeDef
            0x01, 0x00, 0x00, 0x00,                         // Assembly
        ];

        let info = TableInfo::new(&data, 0x0000_0001_0000_0005, 0x05).unwrap();

        assert_eq!(info.rows(TableId::Module), 1);
        assert_eq!(info.rows(TableId::TypeDef), 7);
        assert_eq!(info.rows(TableId::Assembly), 1);
        assert_eq!(info.rows(TableId::AssemblyRef), 0);
        assert!(info.is_large_str());
        assert!(!info.is_large_guid());
        assert!(info.is_large_blob());
    }

    #[test]
    fn unknown_table() {
        let data = [0_u8; 40];
        assert!(matches!(
            TableInfo::new(&data, 1 << 0x2D, 0),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn truncated_row_counts() {
        let data = [0_u8; 26];
        assert!(matches!(
            TableInfo::new(&data, 0x3, 0),
            Err(crate::Error::OutOfBounds)
        ));
    }

    #[test]
    fn row_sizes_short() {
        let info = TableInfo::new_test(
            &[(TableId::Module, 1), (TableId::TypeDef, 1), (TableId::Assembly, 1)],
            false,
            false,
            false,
        );

        assert_eq!(info.row_size(TableId::Module), 10);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::AssemblyRef), 20);
        assert_eq!(info.row_size(TableId::File), 8);
        assert_eq!(info.row_size(TableId::ExportedType), 14);
        assert_eq!(info.row_size(TableId::ManifestResource), 12);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
    }

    #[test]
    fn row_sizes_long() {
        let info = TableInfo::new_test(
            &[
                (TableId::MethodDef, 0x1_0000),
                (TableId::AssemblyRef, 0x4000),
                (TableId::TypeDef, 1),
            ],
            true,
            true,
            true,
        );

        assert_eq!(info.row_size(TableId::Module), 18);
        assert_eq!(info.row_size(TableId::TypeDef), 4 + 4 + 4 + 2 + 2 + 4);
        assert_eq!(info.row_size(TableId::Assembly), 28);
        assert_eq!(info.row_size(TableId::ExportedType), 4 + 4 + 4 + 4 + 4);
        assert_eq!(info.row_size(TableId::ManifestResource), 4 + 4 + 4 + 4);
        assert!(info.is_large_coded(CodedIndexType::Implementation));
        assert!(info.is_large_coded(CodedIndexType::CustomAttributeType));
        assert!(!info.is_large_coded(CodedIndexType::TypeDefOrRef));
    }
}

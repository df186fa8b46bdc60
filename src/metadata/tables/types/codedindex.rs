//! Coded indexes (ECMA-335 II.24.2.6).
//!
//! A coded index packs a table tag into its low bits and a row id into the rest. Its width on
//! disk is 2 bytes unless the largest referenced table needs more than `16 - tag_bits` bits.

use strum::{EnumCount, EnumIter};

use crate::{
    metadata::{tables::TableId, token::Token},
    Error::OutOfBounds,
    Result,
};

/// The families of coded indexes.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum CodedIndexType {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
    HasCustomDebugInformation,
}

impl CodedIndexType {
    /// The tables addressable by this coded index, in tag order.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            // Tags 0, 1 and 4 are unused; they only widen the tag to 3 bits
            CodedIndexType::CustomAttributeType => &[
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MemberRef,
                TableId::MemberRef,
            ],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
            CodedIndexType::HasCustomDebugInformation => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
                TableId::Document,
                TableId::LocalScope,
                TableId::LocalVariable,
                TableId::LocalConstant,
                TableId::ImportScope,
            ],
        }
    }

    /// Number of low bits holding the table tag.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tag_bits(&self) -> u8 {
        let count = self.tables().len();
        (usize::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// A decoded coded index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The referenced table
    pub tag: TableId,
    /// The referenced row; 0 for a nil reference
    pub row: u32,
}

impl CodedIndex {
    /// Splits a raw coded index value of family `ci_type`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the tag names no table of the family.
    pub fn decode(value: u32, ci_type: CodedIndexType) -> Result<CodedIndex> {
        let tables = ci_type.tables();
        let tag_bits = ci_type.tag_bits();
        let tag_mask = (1_u32 << tag_bits) - 1;

        let tag = (value & tag_mask) as usize;
        if tag >= tables.len() {
            return Err(OutOfBounds);
        }

        Ok(CodedIndex {
            tag: tables[tag],
            row: value >> tag_bits,
        })
    }

    /// Returns `true` for a nil reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row == 0
    }

    /// The token of the referenced row.
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(self.tag, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_bits() {
        assert_eq!(CodedIndexType::TypeDefOrRef.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasFieldMarshal.tag_bits(), 1);
        assert_eq!(CodedIndexType::MemberRefParent.tag_bits(), 3);
        assert_eq!(CodedIndexType::Implementation.tag_bits(), 2);
        assert_eq!(CodedIndexType::ResolutionScope.tag_bits(), 2);
        assert_eq!(CodedIndexType::CustomAttributeType.tag_bits(), 3);
        assert_eq!(CodedIndexType::HasCustomAttribute.tag_bits(), 5);
        assert_eq!(CodedIndexType::HasCustomDebugInformation.tag_bits(), 5);
    }

    #[test]
    fn decode_implementation() {
        let file = CodedIndex::decode(1 << 2, CodedIndexType::Implementation).unwrap();
        assert_eq!(file.tag, TableId::File);
        assert_eq!(file.row, 1);
        assert_eq!(file.token(), Token(0x2600_0001));

        let assembly_ref = CodedIndex::decode((3 << 2) | 1, CodedIndexType::Implementation).unwrap();
        assert_eq!(assembly_ref.token(), Token(0x2300_0003));

        let exported = CodedIndex::decode((2 << 2) | 2, CodedIndexType::Implementation).unwrap();
        assert_eq!(exported.token(), Token(0x2700_0002));

        let nil = CodedIndex::decode(0, CodedIndexType::Implementation).unwrap();
        assert!(nil.is_null());

        assert!(CodedIndex::decode(3, CodedIndexType::Implementation).is_err());
    }
}

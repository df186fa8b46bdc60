//! Owned property records returned by [`crate::scope::MetadataScope`] lookups.
//!
//! Every string and byte field is copied out of the module, so a record stays valid after its
//! scope closes.

use crate::metadata::{
    identity::{AssemblyVersion, HashAlgorithm},
    tables::{AssemblyFlags, FileAttributes, ManifestResourceAttributes},
    token::Token,
};

/// Properties of the `Assembly` record, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssemblyProps {
    /// Simple name
    pub name: String,
    /// Four-part version
    pub version: AssemblyVersion,
    /// Public key blob; `None` when the blob is empty
    pub public_key: Option<Vec<u8>>,
    /// Raw `AssemblyHashAlgorithm` id
    pub hash_algorithm_id: u32,
    /// Culture; `None` when neutral
    pub culture: Option<String>,
    /// Assembly flags, uninterpreted
    pub flags: AssemblyFlags,
}

impl RawAssemblyProps {
    /// The hash algorithm id decoded.
    #[must_use]
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::from(self.hash_algorithm_id)
    }
}

/// Properties of an `AssemblyRef` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRefProps {
    /// Simple name of the referenced assembly
    pub name: String,
    /// Requested version
    pub version: AssemblyVersion,
    /// Full public key or 8-byte token, per [`AssemblyFlags::PUBLIC_KEY`]
    pub public_key_or_token: Option<Vec<u8>>,
    /// Culture; `None` when neutral
    pub culture: Option<String>,
    /// Hash of the referenced assembly, rarely present
    pub hash_value: Option<Vec<u8>>,
    /// Reference flags
    pub flags: AssemblyFlags,
}

impl AssemblyRefProps {
    /// Returns `true` if [`AssemblyRefProps::public_key_or_token`] is a full key.
    #[must_use]
    pub fn has_full_public_key(&self) -> bool {
        self.flags.contains(AssemblyFlags::PUBLIC_KEY)
    }
}

/// Properties of a `File` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProps {
    /// File name, without a path
    pub name: String,
    /// Hash of the file contents
    pub hash_value: Option<Vec<u8>>,
    /// File attributes
    pub flags: FileAttributes,
}

impl FileProps {
    /// Returns `true` for a module file, `false` for a resource file.
    #[must_use]
    pub fn contains_metadata(&self) -> bool {
        !self.flags.contains(FileAttributes::CONTAINS_NO_METADATA)
    }
}

/// Properties of an `ExportedType` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTypeProps {
    /// Type name
    pub name: String,
    /// Namespace; `None` for nested types and the global namespace
    pub namespace: Option<String>,
    /// A `File`, an `AssemblyRef` or, for nested types, the enclosing `ExportedType`
    pub implementation: Token,
    /// Row id hint into the `TypeDef` table of the defining module
    pub type_def_id: u32,
    /// `TypeAttributes` bits
    pub flags: u32,
}

impl ExportedTypeProps {
    /// `Namespace.Name`, or the bare name without a namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Returns `true` if the type is nested in another exported type.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.implementation.table() == crate::metadata::tables::TableId::ExportedType as u8
    }
}

/// Properties of a `ManifestResource` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResourceProps {
    /// Resource name
    pub name: String,
    /// `None` for a resource embedded in this module; otherwise a `File` or `AssemblyRef`
    pub implementation: Option<Token>,
    /// Offset into the module's resource section, for embedded resources
    pub offset: u32,
    /// Visibility
    pub flags: ManifestResourceAttributes,
}

impl ManifestResourceProps {
    /// Returns `true` for a resource exported from the assembly.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.bits() & ManifestResourceAttributes::VISIBILITY_MASK
            == ManifestResourceAttributes::PUBLIC.bits()
    }
}

//! Opening modules and reading their manifest.
//!
//! A [`Dispenser`] opens a module and hands back a scope: a read-only view over that module's
//! metadata. Scope operations are expressed by [`MetadataScope`]:
//!
//! - property lookups by [`Token`], returning owned records from [`props`]
//! - paginated enumeration of references, files, exported types and resources through
//!   [`EnumHandle`]s, or the [`Enumeration`] iterator that manages one for you
//! - lookups of exported types and resources by name
//!
//! [`extract`] turns a scope into an [`crate::metadata::identity::AssemblyIdentity`].
//!
//! # Lifecycle
//!
//! A scope is open until [`MetadataScope::close`] is called or the scope is dropped. Closing
//! releases the module bytes and every enumeration cursor exactly once; closing again does
//! nothing, and every other call on a closed scope fails with [`TokenError::ScopeClosed`].
//! Scopes are confined to the thread that opened them.
//!
//! ```rust,no_run
//! use dotinspect::scope::{extract, Dispenser, FileDispenser, MetadataScope, OpenMode};
//!
//! let scope = FileDispenser::new().open("Widgets.Core.dll".as_ref(), OpenMode::ReadOnly)?;
//! let identity = extract(&scope)?;
//! println!("{}", identity.display_name());
//! scope.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod dispenser;
mod enumeration;
mod extract;
mod lifecycle;
mod module;
pub mod props;
mod view;

pub use config::{Backing, OpenMode, OpenOptions};
pub use dispenser::{Dispenser, FileDispenser};
pub use enumeration::{EnumKind, Enumeration};
pub use extract::{extract, read_assembly_identity};
pub use lifecycle::EnumHandle;
pub use module::ModuleScope;
pub use props::{
    AssemblyRefProps, ExportedTypeProps, FileProps, ManifestResourceProps, RawAssemblyProps,
};

pub use crate::error::{ExtractError, LookupError, OpenError, TokenError};

use crate::metadata::token::Token;

/// Page size used by [`MetadataScope::enumerate`] unless a scope overrides it.
pub const DEFAULT_PAGE_SIZE: usize = 32;

/// Read-only access to one module's manifest.
pub trait MetadataScope {
    /// Returns `true` until the scope is closed.
    fn is_open(&self) -> bool;

    /// The token of the module's `Assembly` record.
    ///
    /// # Errors
    /// [`LookupError::NoAssemblyRecord`] for a module without one, such as a netmodule.
    fn get_assembly_token(&self) -> Result<Token, LookupError>;

    /// Properties of the `Assembly` record named by `token`.
    ///
    /// # Errors
    /// [`TokenError::InvalidToken`] if `token` does not name that record,
    /// [`TokenError::CorruptMetadata`] if the record cannot be read.
    fn get_assembly_properties(&self, token: Token) -> Result<RawAssemblyProps, TokenError>;

    /// Properties of an `AssemblyRef` record.
    ///
    /// # Errors
    /// As [`MetadataScope::get_assembly_properties`].
    fn get_assembly_ref_properties(&self, token: Token) -> Result<AssemblyRefProps, TokenError>;

    /// Properties of a `File` record.
    ///
    /// # Errors
    /// As [`MetadataScope::get_assembly_properties`].
    fn get_file_properties(&self, token: Token) -> Result<FileProps, TokenError>;

    /// Properties of an `ExportedType` record.
    ///
    /// # Errors
    /// As [`MetadataScope::get_assembly_properties`].
    fn get_exported_type_properties(&self, token: Token)
        -> Result<ExportedTypeProps, TokenError>;

    /// Properties of a `ManifestResource` record.
    ///
    /// # Errors
    /// As [`MetadataScope::get_assembly_properties`].
    fn get_manifest_resource_properties(
        &self,
        token: Token,
    ) -> Result<ManifestResourceProps, TokenError>;

    /// Opens a cursor over every record of `kind`, positioned before the first one.
    ///
    /// # Errors
    /// [`TokenError::ScopeClosed`] on a closed scope.
    fn begin_enum(&self, kind: EnumKind) -> Result<EnumHandle, TokenError>;

    /// Takes the next tokens of `handle`: at most `max_count`, in row order, none repeated or
    /// skipped. An exhausted or closed cursor yields an empty page, as does `max_count == 0`.
    ///
    /// # Errors
    /// [`TokenError::ScopeClosed`] on a closed scope, [`TokenError::ForeignHandle`] for a
    /// handle from another scope.
    fn advance(&self, handle: &EnumHandle, max_count: usize) -> Result<Vec<Token>, TokenError>;

    /// Releases the cursor of `handle`. Releasing twice, or after the scope closed, does
    /// nothing.
    fn close_enum(&self, handle: &EnumHandle);

    /// Finds an exported type by `Namespace.Name`, or by bare name for a type without a
    /// namespace. With `enclosing` unset only top-level types match; otherwise only types
    /// nested directly in `enclosing`.
    ///
    /// # Errors
    /// [`LookupError::NotFound`] if no record matches, [`LookupError::Token`] for a closed scope
    /// or an `enclosing` token that is not an exported type.
    fn find_exported_type_by_name(
        &self,
        name: &str,
        enclosing: Option<Token>,
    ) -> Result<Token, LookupError>;

    /// Finds a manifest resource by exact name.
    ///
    /// # Errors
    /// [`LookupError::NotFound`] if no record matches.
    fn find_resource_by_name(&self, name: &str) -> Result<Token, LookupError>;

    /// Releases the module and every open cursor.
    fn close(&self);

    /// Tokens fetched per page by [`MetadataScope::enumerate`].
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Opens a cursor over assembly references.
    ///
    /// # Errors
    /// As [`MetadataScope::begin_enum`].
    fn begin_enum_references(&self) -> Result<EnumHandle, TokenError> {
        self.begin_enum(EnumKind::References)
    }

    /// Opens a cursor over files.
    ///
    /// # Errors
    /// As [`MetadataScope::begin_enum`].
    fn begin_enum_files(&self) -> Result<EnumHandle, TokenError> {
        self.begin_enum(EnumKind::Files)
    }

    /// Opens a cursor over exported types.
    ///
    /// # Errors
    /// As [`MetadataScope::begin_enum`].
    fn begin_enum_exported_types(&self) -> Result<EnumHandle, TokenError> {
        self.begin_enum(EnumKind::ExportedTypes)
    }

    /// Opens a cursor over manifest resources.
    ///
    /// # Errors
    /// As [`MetadataScope::begin_enum`].
    fn begin_enum_resources(&self) -> Result<EnumHandle, TokenError> {
        self.begin_enum(EnumKind::Resources)
    }

    /// Iterates every record of `kind`; the cursor is closed when the iterator is dropped.
    ///
    /// # Errors
    /// As [`MetadataScope::begin_enum`].
    fn enumerate(&self, kind: EnumKind) -> Result<Enumeration<'_, Self>, TokenError>
    where
        Self: Sized,
    {
        let handle = self.begin_enum(kind)?;
        Ok(Enumeration::new(self, handle, self.page_size()))
    }
}

//! [`ModuleScope`], the scope produced by [`crate::scope::FileDispenser`].

use std::{
    cell::RefCell,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use crate::{
    error::{LookupError, TokenError},
    metadata::{
        identity::AssemblyVersion,
        tables::{
            AssemblyFlags, AssemblyRaw, AssemblyRefRaw, ExportedTypeRaw, FileAttributes, FileRaw,
            ManifestResourceAttributes, ManifestResourceRaw, MetadataTable, RowReadable, TableId,
        },
        token::Token,
    },
    scope::{
        lifecycle::{next_scope_id, CursorRegistry},
        view::{MetadataView, ModuleImage},
        AssemblyRefProps, EnumHandle, EnumKind, ExportedTypeProps, FileProps,
        ManifestResourceProps, MetadataScope, RawAssemblyProps,
    },
};

/// A read-only view over one module's metadata.
///
/// The scope exclusively owns the module's bytes. They are released by
/// [`MetadataScope::close`] or on drop, whichever comes first. `ModuleScope` is neither `Send`
/// nor `Sync`.
pub struct ModuleScope {
    id: u64,
    path: Option<PathBuf>,
    image: RefCell<Option<ModuleImage>>,
    cursors: RefCell<CursorRegistry>,
    page_size: usize,
    _not_send: PhantomData<*const ()>,
}

impl ModuleScope {
    pub(crate) fn new(image: ModuleImage, path: Option<&Path>, page_size: usize) -> Self {
        let scope = ModuleScope {
            id: next_scope_id(),
            path: path.map(Path::to_path_buf),
            image: RefCell::new(Some(image)),
            cursors: RefCell::new(CursorRegistry::default()),
            page_size: page_size.max(1),
            _not_send: PhantomData,
        };

        debug!(scope = scope.id, path = ?scope.path, "opened module scope");
        scope
    }

    /// The path the module was opened from; `None` for in-memory images.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of enumeration cursors not yet closed.
    #[must_use]
    pub fn open_enumerations(&self) -> usize {
        self.cursors.borrow().outstanding()
    }

    /// Runs `f` against the metadata, or fails if the scope is closed.
    fn with_metadata<R>(
        &self,
        f: impl for<'this> FnOnce(&MetadataView<'this>) -> Result<R, TokenError>,
    ) -> Result<R, TokenError> {
        let image = self.image.borrow();
        match image.as_ref() {
            Some(image) => image.with_metadata(f),
            None => Err(TokenError::ScopeClosed),
        }
    }

    fn check_handle(&self, handle: &EnumHandle) -> Result<(), TokenError> {
        if !self.is_open() {
            return Err(TokenError::ScopeClosed);
        }
        if handle.scope_id != self.id {
            return Err(TokenError::ForeignHandle);
        }

        Ok(())
    }
}

/// Reads the row `token` names from `T`'s table.
fn row<T: RowReadable>(view: &MetadataView<'_>, token: Token) -> Result<T, TokenError> {
    if token.table() != T::TABLE_ID as u8 || token.row() == 0 {
        return Err(TokenError::InvalidToken(token));
    }

    let table: MetadataTable<'_, T> = view.table::<T>().ok_or(TokenError::InvalidToken(token))?;
    if token.row() > table.row_count() {
        return Err(TokenError::InvalidToken(token));
    }

    Ok(table.try_get(token.row())?)
}

fn exported_type(
    view: &MetadataView<'_>,
    raw: &ExportedTypeRaw,
) -> Result<ExportedTypeProps, TokenError> {
    Ok(ExportedTypeProps {
        name: view.read_string(raw.name)?,
        namespace: view.read_optional_string(raw.namespace)?,
        implementation: raw.implementation.token(),
        type_def_id: raw.type_def_id,
        flags: raw.flags,
    })
}

impl MetadataScope for ModuleScope {
    fn is_open(&self) -> bool {
        self.image.borrow().is_some()
    }

    fn get_assembly_token(&self) -> Result<Token, LookupError> {
        let rows = self.with_metadata(|view| Ok(view.tables.table_row_count(TableId::Assembly)))?;

        match rows {
            0 => Err(LookupError::NoAssemblyRecord),
            1 => Ok(Token::from_parts(TableId::Assembly, 1)),
            rows => Err(TokenError::CorruptMetadata(malformed_error!(
                "Assembly table has {} rows",
                rows
            ))
            .into()),
        }
    }

    fn get_assembly_properties(&self, token: Token) -> Result<RawAssemblyProps, TokenError> {
        self.with_metadata(|view| {
            let raw = row::<AssemblyRaw>(view, token)?;

            Ok(RawAssemblyProps {
                name: view.read_string(raw.name)?,
                version: AssemblyVersion::new(
                    raw.major_version,
                    raw.minor_version,
                    raw.build_number,
                    raw.revision_number,
                ),
                public_key: view.read_optional_blob(raw.public_key)?,
                hash_algorithm_id: raw.hash_alg_id,
                culture: view.read_optional_string(raw.culture)?,
                flags: AssemblyFlags::from_bits_retain(raw.flags),
            })
        })
    }

    fn get_assembly_ref_properties(&self, token: Token) -> Result<AssemblyRefProps, TokenError> {
        self.with_metadata(|view| {
            let raw = row::<AssemblyRefRaw>(view, token)?;

            Ok(AssemblyRefProps {
                name: view.read_string(raw.name)?,
                version: AssemblyVersion::new(
                    raw.major_version,
                    raw.minor_version,
                    raw.build_number,
                    raw.revision_number,
                ),
                public_key_or_token: view.read_optional_blob(raw.public_key_or_token)?,
                culture: view.read_optional_string(raw.culture)?,
                hash_value: view.read_optional_blob(raw.hash_value)?,
                flags: AssemblyFlags::from_bits_retain(raw.flags),
            })
        })
    }

    fn get_file_properties(&self, token: Token) -> Result<FileProps, TokenError> {
        self.with_metadata(|view| {
            let raw = row::<FileRaw>(view, token)?;

            Ok(FileProps {
                name: view.read_string(raw.name)?,
                hash_value: view.read_optional_blob(raw.hash_value)?,
                flags: FileAttributes::from_bits_retain(raw.flags),
            })
        })
    }

    fn get_exported_type_properties(
        &self,
        token: Token,
    ) -> Result<ExportedTypeProps, TokenError> {
        self.with_metadata(|view| {
            let raw = row::<ExportedTypeRaw>(view, token)?;
            exported_type(view, &raw)
        })
    }

    fn get_manifest_resource_properties(
        &self,
        token: Token,
    ) -> Result<ManifestResourceProps, TokenError> {
        self.with_metadata(|view| {
            let raw = row::<ManifestResourceRaw>(view, token)?;

            Ok(ManifestResourceProps {
                name: view.read_string(raw.name)?,
                implementation: (!raw.implementation.is_null())
                    .then(|| raw.implementation.token()),
                offset: raw.offset_field,
                flags: ManifestResourceAttributes::from_bits_retain(raw.flags),
            })
        })
    }

    fn begin_enum(&self, kind: EnumKind) -> Result<EnumHandle, TokenError> {
        let rows = self.with_metadata(|view| Ok(view.tables.table_row_count(kind.table())))?;

        let handle = self.cursors.borrow_mut().open(self.id, kind, rows);
        trace!(scope = self.id, ?kind, rows, slot = handle.slot, "begin enumeration");
        Ok(handle)
    }

    fn advance(&self, handle: &EnumHandle, max_count: usize) -> Result<Vec<Token>, TokenError> {
        self.check_handle(handle)?;
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let tokens = self.cursors.borrow_mut().advance(handle, max_count);
        trace!(
            scope = self.id,
            kind = ?handle.kind,
            requested = max_count,
            returned = tokens.len(),
            "advance enumeration"
        );
        Ok(tokens)
    }

    fn close_enum(&self, handle: &EnumHandle) {
        if handle.scope_id != self.id {
            return;
        }

        if self.cursors.borrow_mut().release(handle) {
            trace!(scope = self.id, kind = ?handle.kind, "closed enumeration");
        }
    }

    fn find_exported_type_by_name(
        &self,
        name: &str,
        enclosing: Option<Token>,
    ) -> Result<Token, LookupError> {
        let found = self.with_metadata(|view| {
            let Some(table) = view.table::<ExportedTypeRaw>() else {
                if let Some(enclosing) = enclosing {
                    return Err(TokenError::InvalidToken(enclosing));
                }
                return Ok(None);
            };

            if let Some(enclosing) = enclosing {
                let valid = enclosing.table() == TableId::ExportedType as u8
                    && enclosing.row() != 0
                    && enclosing.row() <= table.row_count();
                if !valid {
                    return Err(TokenError::InvalidToken(enclosing));
                }
            }

            for rid in 1..=table.row_count() {
                let raw = table.try_get(rid)?;

                let nested_in = (raw.implementation.tag == TableId::ExportedType)
                    .then(|| raw.implementation.token());
                if nested_in != enclosing {
                    continue;
                }

                if exported_type(view, &raw)?.full_name() == name {
                    return Ok(Some(raw.token));
                }
            }

            Ok(None)
        })?;

        found.ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    fn find_resource_by_name(&self, name: &str) -> Result<Token, LookupError> {
        let found = self.with_metadata(|view| {
            let Some(table) = view.table::<ManifestResourceRaw>() else {
                return Ok(None);
            };

            for rid in 1..=table.row_count() {
                let raw = table.try_get(rid)?;
                if view.read_string(raw.name)? == name {
                    return Ok(Some(raw.token));
                }
            }

            Ok(None)
        })?;

        found.ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    fn close(&self) {
        let Some(image) = self.image.borrow_mut().take() else {
            return;
        };

        let unreleased = self.cursors.borrow_mut().release_all();
        if unreleased > 0 {
            warn!(scope = self.id, unreleased, "closing scope with open enumerations");
        }

        drop(image);
        debug!(scope = self.id, path = ?self.path, "closed module scope");
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Drop for ModuleScope {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ModuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleScope")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

//! Record kinds and the RAII iterator over them.

use std::collections::VecDeque;

use crate::{
    error::TokenError,
    metadata::{tables::TableId, token::Token},
    scope::{EnumHandle, MetadataScope},
};

/// The categories of manifest records a scope can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// `AssemblyRef` records
    References,
    /// `File` records
    Files,
    /// `ExportedType` records
    ExportedTypes,
    /// `ManifestResource` records
    Resources,
}

impl EnumKind {
    /// The table whose rows this kind enumerates.
    #[must_use]
    pub fn table(&self) -> TableId {
        match self {
            EnumKind::References => TableId::AssemblyRef,
            EnumKind::Files => TableId::File,
            EnumKind::ExportedTypes => TableId::ExportedType,
            EnumKind::Resources => TableId::ManifestResource,
        }
    }
}

/// Iterates the tokens of one [`EnumKind`], fetching them a page at a time.
///
/// The underlying handle is closed when the iterator is exhausted or dropped, whichever comes
/// first. An error from the scope is yielded once and ends the iteration.
///
/// ```rust,ignore
/// for token in scope.enumerate(EnumKind::References)? {
///     let reference = scope.get_assembly_ref_properties(token?)?;
///     println!("{} {}", reference.name, reference.version);
/// }
/// ```
pub struct Enumeration<'s, S: MetadataScope + ?Sized> {
    scope: &'s S,
    handle: Option<EnumHandle>,
    page: VecDeque<Token>,
    page_size: usize,
}

impl<'s, S: MetadataScope + ?Sized> Enumeration<'s, S> {
    pub(crate) fn new(scope: &'s S, handle: EnumHandle, page_size: usize) -> Self {
        Enumeration {
            scope,
            handle: Some(handle),
            page: VecDeque::new(),
            page_size: page_size.max(1),
        }
    }

    fn finish(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scope.close_enum(&handle);
        }
    }
}

impl<S: MetadataScope + ?Sized> Iterator for Enumeration<'_, S> {
    type Item = Result<Token, TokenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.page.pop_front() {
            return Some(Ok(token));
        }

        let handle = self.handle.as_ref()?;
        match self.scope.advance(handle, self.page_size) {
            Ok(tokens) if tokens.is_empty() => {
                self.finish();
                None
            }
            Ok(tokens) => {
                self.page.extend(tokens);
                self.page.pop_front().map(Ok)
            }
            Err(error) => {
                self.finish();
                Some(Err(error))
            }
        }
    }
}

impl<S: MetadataScope + ?Sized> Drop for Enumeration<'_, S> {
    fn drop(&mut self) {
        self.finish();
    }
}

//! Identity extraction.

use std::path::Path;

use crate::{
    error::ExtractError,
    metadata::identity::{AssemblyIdentity, HashAlgorithm},
    scope::{Dispenser, FileDispenser, MetadataScope, OpenMode},
};

/// Reads the [`AssemblyIdentity`] of the module behind `scope`.
///
/// The key material is all or nothing: with a non-empty public key both
/// [`AssemblyIdentity::public_key`] and [`AssemblyIdentity::hash_algorithm`] are set, otherwise
/// neither is.
///
/// # Errors
/// [`ExtractError::NoIdentity`] if the module has no assembly record, [`ExtractError::Token`]
/// if the scope is closed or the record is corrupt.
pub fn extract<S: MetadataScope + ?Sized>(scope: &S) -> Result<AssemblyIdentity, ExtractError> {
    let token = scope.get_assembly_token()?;
    let props = scope.get_assembly_properties(token)?;

    let (public_key, hash_algorithm) = match props.public_key {
        Some(key) if !key.is_empty() => (
            Some(key),
            Some(HashAlgorithm::from(props.hash_algorithm_id)),
        ),
        _ => (None, None),
    };

    Ok(AssemblyIdentity {
        name: props.name,
        version: props.version,
        public_key,
        hash_algorithm,
    })
}

/// Opens `path`, extracts its identity and closes it again.
///
/// # Errors
/// [`ExtractError::Open`] if the module cannot be opened, otherwise as [`extract`].
pub fn read_assembly_identity(path: impl AsRef<Path>) -> Result<AssemblyIdentity, ExtractError> {
    let scope = FileDispenser::new().open(path.as_ref(), OpenMode::ReadOnly)?;
    let identity = extract(&scope);
    scope.close();

    identity
}

//! # dotinspect Prelude
//!
//! The types needed to open a module and read its identity and manifest.
//!
//! ```rust,no_run
//! use dotinspect::prelude::*;
//!
//! let scope = FileDispenser::new().open_bytes(std::fs::read("Widgets.Core.dll")?)?;
//! let identity = extract(&scope)?;
//! assert!(identity.public_key.is_none() || identity.hash_algorithm.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use crate::{Error, Result};

pub use crate::metadata::{
    identity::{AssemblyIdentity, AssemblyVersion, HashAlgorithm},
    tables::{AssemblyFlags, FileAttributes, ManifestResourceAttributes},
    token::Token,
};

pub use crate::scope::{
    extract, read_assembly_identity, AssemblyRefProps, Backing, Dispenser, EnumHandle, EnumKind,
    Enumeration, ExportedTypeProps, ExtractError, FileDispenser, FileProps, LookupError,
    ManifestResourceProps, MetadataScope, ModuleScope, OpenError, OpenMode, OpenOptions,
    RawAssemblyProps, TokenError,
};

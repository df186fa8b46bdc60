// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
// unsafe code is limited to the memory map in 'file/physical.rs'

//! # dotinspect
//!
//! Read-only identity inspection for .NET assemblies.
//!
//! `dotinspect` opens a compiled module (a PE image carrying ECMA-335 metadata) as a passive
//! container and reads its manifest: the assembly's name, version and strong-name key, plus the
//! assemblies it references, the files it spans, the types it exports and the resources it
//! carries. Nothing in the module is executed and no runtime is required.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotinspect::prelude::*;
//!
//! let identity = read_assembly_identity("Widgets.Core.dll")?;
//! println!("{}", identity.display_name());
//! # Ok::<(), ExtractError>(())
//! ```
//!
//! ### Walking the manifest
//!
//! ```rust,no_run
//! use dotinspect::prelude::*;
//!
//! let scope = FileDispenser::new().open("Widgets.Core.dll".as_ref(), OpenMode::ReadOnly)?;
//!
//! for token in scope.enumerate(EnumKind::References)? {
//!     let reference = scope.get_assembly_ref_properties(token?)?;
//!     println!("-> {} {}", reference.name, reference.version);
//! }
//!
//! let strings = scope.find_resource_by_name("Widgets.Core.Strings.resources")?;
//! println!("{:?}", scope.get_manifest_resource_properties(strings)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`scope`] - dispensers, scopes, enumeration and identity extraction
//! - [`metadata`] - the ECMA-335 structures a scope is built on
//! - [`prelude`] - re-exports of the types most callers need
//! - [`Error`] and [`Result`] - low-level parse errors; [`scope`] wraps them in the
//!   [`scope::OpenError`], [`scope::TokenError`], [`scope::LookupError`] and
//!   [`scope::ExtractError`] families
//!
//! Opening and closing scopes is logged through `tracing` at debug level; install a subscriber
//! to see it.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// ECMA-335 metadata parsing: CLI header, metadata root, streams, tables and tokens.
pub mod metadata;

/// Dispensers, scopes, enumeration and identity extraction.
pub mod scope;

/// `dotinspect` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotinspect` low-level parse error.
pub use error::Error;

/// Raw access to a module image.
pub use file::File;

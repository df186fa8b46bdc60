//! ECMA-335 metadata structures, read straight from a module's bytes.
//!
//! The path from a PE image to a manifest row runs through:
//!
//! 1. [`cor20header::Cor20Header`], the CLI header the CLR data directory points at
//! 2. [`root::Root`], the `BSJB` metadata root and its stream directory
//! 3. [`streams::TablesHeader`] and the [`streams::Strings`] and [`streams::Blob`] heaps
//! 4. the row types in [`tables`]
//!
//! [`identity`] holds the owned values derived from those rows, and [`token`] the 32-bit
//! handles that name a row.

pub mod cor20header;
pub mod identity;
pub mod root;
pub mod streams;
pub mod tables;
pub mod token;

//! Assembly identity: the simple name, the version and the strong-name key material.
//!
//! [`AssemblyIdentity`] is what [`crate::scope::extract`] produces from a module's `Assembly`
//! record. It can also render the conventional display name and derive the public key token.

mod assembly;
mod hash;

pub use assembly::{AssemblyIdentity, AssemblyVersion};
pub use hash::HashAlgorithm;

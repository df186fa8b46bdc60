use std::{
    fmt::{self, Write},
    str::FromStr,
};

use sha1::{Digest, Sha1};

use crate::{metadata::identity::HashAlgorithm, Error, Result};

/// The four-part version of an assembly.
///
/// Ordering is component-wise, most significant first.
///
/// ```rust
/// use dotinspect::metadata::identity::AssemblyVersion;
///
/// let version: AssemblyVersion = "2.1".parse()?;
/// assert_eq!(version, AssemblyVersion::new(2, 1, 0, 0));
/// assert!(version > AssemblyVersion::new(2, 0, 9, 9));
/// assert_eq!(version.to_string(), "2.1.0.0");
/// # Ok::<(), dotinspect::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component
    pub major: u16,
    /// Minor version component
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyVersion {
            major,
            minor,
            build,
            revision,
        }
    }

    /// The version as a `(major, minor, build, revision)` tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> (u16, u16, u16, u16) {
        (self.major, self.minor, self.build, self.revision)
    }

    /// Parses `major[.minor[.build[.revision]]]`; missing components are 0.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for more than four components or a component that is
    /// not a `u16`.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();

        if parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .trim()
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl From<(u16, u16, u16, u16)> for AssemblyVersion {
    fn from(value: (u16, u16, u16, u16)) -> Self {
        AssemblyVersion::new(value.0, value.1, value.2, value.3)
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The logical identity of an assembly.
///
/// `public_key` and `hash_algorithm` are either both present or both absent: an unsigned
/// assembly has neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple name, e.g. `Widgets.Core`
    pub name: String,
    /// Four-part version
    pub version: AssemblyVersion,
    /// Full public key blob of a signed assembly
    pub public_key: Option<Vec<u8>>,
    /// Hash algorithm of a signed assembly
    pub hash_algorithm: Option<HashAlgorithm>,
}

impl AssemblyIdentity {
    /// The 8-byte public key token: the last 8 bytes of the key's SHA-1 digest, reversed.
    ///
    /// The token is always SHA-1 based, whatever [`AssemblyIdentity::hash_algorithm`] says.
    #[must_use]
    pub fn public_key_token(&self) -> Option<[u8; 8]> {
        let public_key = self.public_key.as_ref()?;

        let digest = Sha1::digest(public_key);
        let mut token = [0u8; 8];
        token.copy_from_slice(&digest[digest.len() - 8..]);
        token.reverse();

        Some(token)
    }

    /// `Name, Version=a.b.c.d, PublicKeyToken=xxxxxxxxxxxxxxxx`, with `null` for an unsigned
    /// assembly.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut result = String::with_capacity(self.name.len() + 64);

        result.push_str(&self.name);
        let _ = write!(result, ", Version={}", self.version);

        result.push_str(", PublicKeyToken=");
        match self.public_key_token() {
            Some(token) => {
                for byte in token {
                    let _ = write!(result, "{byte:02x}");
                }
            }
            None => result.push_str("null"),
        }

        result
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

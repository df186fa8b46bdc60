//! `AssemblyHashAlgorithm` ids (ECMA-335 II.23.1.1).

use std::fmt;

/// The algorithm an assembly uses to hash its files and derive its public key token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// No hashing (0x0000)
    None,
    /// MD5 (0x8003)
    Md5,
    /// SHA-1 (0x8004)
    Sha1,
    /// SHA-256 (0x800C)
    Sha256,
    /// SHA-384 (0x800D)
    Sha384,
    /// SHA-512 (0x800E)
    Sha512,
    /// An id outside the ECMA-335 and CoreCLR set
    Other(u32),
}

impl HashAlgorithm {
    /// `CALG_MD5`
    pub const MD5: u32 = 0x8003;
    /// `CALG_SHA1`
    pub const SHA1: u32 = 0x8004;
    /// `CALG_SHA_256`
    pub const SHA256: u32 = 0x800C;
    /// `CALG_SHA_384`
    pub const SHA384: u32 = 0x800D;
    /// `CALG_SHA_512`
    pub const SHA512: u32 = 0x800E;

    /// The raw id as stored in the `Assembly` table.
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            HashAlgorithm::None => 0,
            HashAlgorithm::Md5 => Self::MD5,
            HashAlgorithm::Sha1 => Self::SHA1,
            HashAlgorithm::Sha256 => Self::SHA256,
            HashAlgorithm::Sha384 => Self::SHA384,
            HashAlgorithm::Sha512 => Self::SHA512,
            HashAlgorithm::Other(id) => *id,
        }
    }
}

impl From<u32> for HashAlgorithm {
    fn from(id: u32) -> Self {
        match id {
            0 => HashAlgorithm::None,
            Self::MD5 => HashAlgorithm::Md5,
            Self::SHA1 => HashAlgorithm::Sha1,
            Self::SHA256 => HashAlgorithm::Sha256,
            Self::SHA384 => HashAlgorithm::Sha384,
            Self::SHA512 => HashAlgorithm::Sha512,
            other => HashAlgorithm::Other(other),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::None => write!(f, "None"),
            HashAlgorithm::Md5 => write!(f, "MD5"),
            HashAlgorithm::Sha1 => write!(f, "SHA1"),
            HashAlgorithm::Sha256 => write!(f, "SHA256"),
            HashAlgorithm::Sha384 => write!(f, "SHA384"),
            HashAlgorithm::Sha512 => write!(f, "SHA512"),
            HashAlgorithm::Other(id) => write!(f, "0x{id:04x}"),
        }
    }
}

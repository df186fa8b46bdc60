use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The low-level parsing error, produced while walking the PE image and the metadata streams.
///
/// Callers of the public API rarely see this type directly: [`OpenError`], [`TokenError`],
/// [`LookupError`] and [`ExtractError`] wrap it as their `source` wherever the underlying cause
/// is a structural problem with the module.
///
/// # Examples
///
/// ```rust
/// use dotinspect::{Error, scope::{FileDispenser, OpenError}};
///
/// match FileDispenser::new().open_bytes(vec![0x4D, 0x5A, 0x00]) {
///     Err(OpenError::NotAManagedModule(reason)) => println!("skipping: {reason}"),
///     Err(OpenError::CorruptMetadata(Error::Malformed { message, .. })) => eprintln!("{message}"),
///     Err(other) => eprintln!("{other}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// Carries the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Returned when the image is a valid PE but carries no CLR runtime header.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}

/// Failure of [`crate::scope::Dispenser::open`].
///
/// Fatal to that pipeline; nothing in this crate retries an open.
#[derive(Error, Debug)]
pub enum OpenError {
    /// The path does not exist.
    #[error("module not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The process lacks permission to read the path.
    #[error("access denied: {}", .0.display())]
    AccessDenied(PathBuf),

    /// The file is readable but carries no CLI metadata region (not a PE image, or a native PE).
    #[error("not a managed module: {0}")]
    NotAManagedModule(String),

    /// The CLI metadata region is present but structurally invalid.
    #[error("corrupt metadata")]
    CorruptMetadata(#[source] Error),

    /// Any other I/O failure while reading the file.
    #[error("failed to read module")]
    Io(#[source] std::io::Error),
}

impl OpenError {
    /// Classifies a low-level parsing failure encountered while opening `path`.
    pub(crate) fn from_parse(path: Option<&std::path::Path>, error: Error) -> Self {
        match error {
            Error::FileError(io) => match (io.kind(), path) {
                (std::io::ErrorKind::NotFound, Some(path)) => OpenError::NotFound(path.to_path_buf()),
                (std::io::ErrorKind::PermissionDenied, Some(path)) => {
                    OpenError::AccessDenied(path.to_path_buf())
                }
                _ => OpenError::Io(io),
            },
            Error::Empty => OpenError::NotAManagedModule("file is empty".to_string()),
            Error::NotSupported => {
                OpenError::NotAManagedModule("no CLR runtime header".to_string())
            }
            Error::GoblinErr(goblin) => OpenError::NotAManagedModule(goblin.to_string()),
            other => OpenError::CorruptMetadata(other),
        }
    }
}

/// Failure of a token-addressed [`crate::scope::MetadataScope`] call.
///
/// Indicates caller misuse (stale scope, foreign token or handle) or a record that cannot be
/// decoded; never a transient condition.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token does not name a row of the expected table in this scope.
    #[error("invalid token {0}")]
    InvalidToken(Token),

    /// The scope has been closed.
    #[error("scope is closed")]
    ScopeClosed,

    /// The enumeration handle was issued by a different scope.
    #[error("enumeration handle belongs to another scope")]
    ForeignHandle,

    /// The row addressed by a valid token references data outside its heap.
    #[error("corrupt metadata record")]
    CorruptMetadata(#[source] Error),
}

impl From<Error> for TokenError {
    fn from(error: Error) -> Self {
        TokenError::CorruptMetadata(error)
    }
}

/// Failure of a name or singleton lookup on a scope.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The module carries no `Assembly` row; it is a netmodule, not an assembly.
    #[error("module has no assembly record")]
    NoAssemblyRecord,

    /// No record matches the requested name.
    #[error("no record named '{0}'")]
    NotFound(String),

    /// The lookup failed before it could complete.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Failure of [`crate::scope::extract`] and [`crate::scope::read_assembly_identity`].
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The module carries no assembly identity record.
    #[error("module carries no assembly identity")]
    NoIdentity,

    /// Opening the module failed.
    #[error(transparent)]
    Open(#[from] OpenError),

    /// Reading the identity record failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<LookupError> for ExtractError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::NoAssemblyRecord | LookupError::NotFound(_) => ExtractError::NoIdentity,
            LookupError::Token(inner) => ExtractError::Token(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn classify_io() {
        let path = Path::new("missing.dll");

        let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            OpenError::from_parse(Some(path), Error::FileError(not_found)),
            OpenError::NotFound(p) if p == path
        ));

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            OpenError::from_parse(Some(path), Error::FileError(denied)),
            OpenError::AccessDenied(_)
        ));

        let other = std::io::Error::from(std::io::ErrorKind::Interrupted);
        assert!(matches!(
            OpenError::from_parse(Some(path), Error::FileError(other)),
            OpenError::Io(_)
        ));
    }

    #[test]
    fn classify_parse() {
        assert!(matches!(
            OpenError::from_parse(None, Error::Empty),
            OpenError::NotAManagedModule(_)
        ));
        assert!(matches!(
            OpenError::from_parse(None, Error::NotSupported),
            OpenError::NotAManagedModule(_)
        ));
        assert!(matches!(
            OpenError::from_parse(None, malformed_error!("bad root")),
            OpenError::CorruptMetadata(Error::Malformed { .. })
        ));
        assert!(matches!(
            OpenError::from_parse(None, Error::OutOfBounds),
            OpenError::CorruptMetadata(Error::OutOfBounds)
        ));
    }

    #[test]
    fn lookup_into_extract() {
        assert!(matches!(
            ExtractError::from(LookupError::NoAssemblyRecord),
            ExtractError::NoIdentity
        ));
        assert!(matches!(
            ExtractError::from(LookupError::Token(TokenError::ScopeClosed)),
            ExtractError::Token(TokenError::ScopeClosed)
        ));
    }
}

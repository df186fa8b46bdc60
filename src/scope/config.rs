//! Options for opening a module.

/// Access mode requested from a [`crate::scope::Dispenser`].
///
/// Inspection never writes, so read-only is the only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Shared, read-only access to the module bytes
    #[default]
    ReadOnly,
}

/// How module bytes are brought into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backing {
    /// Memory-map the file read-only
    #[default]
    Mapped,
    /// Read the whole file into an owned buffer
    Buffered,
}

/// Configuration for [`crate::scope::FileDispenser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Requested access mode
    pub mode: OpenMode,
    /// Mapped or buffered file access; ignored for in-memory images
    pub backing: Backing,
    /// Upper bound on the metadata region size declared by the CLI header
    pub max_metadata_size: usize,
    /// Resolve every heap reference of the manifest tables while opening, so that a corrupt
    /// record fails the open instead of a later property read
    pub validate_on_open: bool,
    /// Number of tokens an [`crate::scope::Enumeration`] fetches per page
    pub page_size: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::ReadOnly,
            backing: Backing::Mapped,
            max_metadata_size: 0x1000_0000,
            validate_on_open: false,
            page_size: 32,
        }
    }
}

impl OpenOptions {
    /// No size cap and no eager validation.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_metadata_size: usize::MAX,
            validate_on_open: false,
            ..Self::default()
        }
    }

    /// Eager validation and a 64 MiB cap on the metadata region.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_metadata_size: 0x0400_0000,
            validate_on_open: true,
            ..Self::default()
        }
    }

    /// Returns these options with `backing` replaced.
    #[must_use]
    pub fn with_backing(mut self, backing: Backing) -> Self {
        self.backing = backing;
        self
    }

    /// Returns these options with `page_size` replaced; values below 1 are raised to 1.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

//! Opening modules.

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    error::OpenError,
    file::File,
    scope::{view::ModuleImage, Backing, MetadataScope, ModuleScope, OpenMode, OpenOptions},
    Error,
};

/// Opens modules as scopes.
pub trait Dispenser {
    /// The scope type this dispenser produces.
    type Scope: MetadataScope;

    /// Opens the module at `path`.
    ///
    /// The module is only read: nothing in it is executed, mapped executable or initialized.
    ///
    /// # Errors
    /// - [`OpenError::NotFound`] if `path` does not exist
    /// - [`OpenError::AccessDenied`] if it cannot be read
    /// - [`OpenError::NotAManagedModule`] for an empty file, a non-PE file or a PE without a CLR
    ///   runtime header
    /// - [`OpenError::CorruptMetadata`] if the CLR header is present but its metadata is not
    ///   well-formed
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Self::Scope, OpenError>;
}

/// The [`Dispenser`] for modules on disk or in memory.
///
/// ```rust,no_run
/// use dotinspect::scope::{Backing, Dispenser, FileDispenser, OpenMode, OpenOptions};
///
/// let dispenser = FileDispenser::with_options(OpenOptions::strict().with_backing(Backing::Buffered));
/// let scope = dispenser.open("Widgets.Core.dll".as_ref(), OpenMode::ReadOnly)?;
/// # Ok::<(), dotinspect::scope::OpenError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileDispenser {
    options: OpenOptions,
}

impl FileDispenser {
    /// A dispenser with [`OpenOptions::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispenser with custom options.
    #[must_use]
    pub fn with_options(options: OpenOptions) -> Self {
        FileDispenser { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Opens a module image that is already in memory.
    ///
    /// # Errors
    /// As [`Dispenser::open`], without the file system failures.
    pub fn open_bytes(&self, data: Vec<u8>) -> Result<ModuleScope, OpenError> {
        debug!(len = data.len(), "opening in-memory module");

        let file = File::from_mem(data).map_err(|error| classify(None, error))?;
        self.open_file(file, None)
    }

    fn open_file(&self, file: File, path: Option<&Path>) -> Result<ModuleScope, OpenError> {
        let image = ModuleImage::load(file, &self.options).map_err(|error| classify(path, error))?;

        if self.options.validate_on_open {
            image
                .with_metadata(|view| view.validate())
                .map_err(|error| classify(path, error))?;
        }

        Ok(ModuleScope::new(image, path, self.options.page_size))
    }
}

impl Dispenser for FileDispenser {
    type Scope = ModuleScope;

    fn open(&self, path: &Path, mode: OpenMode) -> Result<ModuleScope, OpenError> {
        match mode {
            OpenMode::ReadOnly => {}
        }

        debug!(path = %path.display(), backing = ?self.options.backing, "opening module");

        let file = match self.options.backing {
            Backing::Mapped => File::from_file(path),
            Backing::Buffered => std::fs::read(path)
                .map_err(Error::FileError)
                .and_then(File::from_mem),
        }
        .map_err(|error| classify(Some(path), error))?;

        self.open_file(file, Some(path))
    }
}

fn classify(path: Option<&Path>, error: Error) -> OpenError {
    let error = OpenError::from_parse(path, error);
    if let OpenError::CorruptMetadata(cause) = &error {
        warn!(path = ?path, %cause, "module has corrupt metadata");
    }

    error
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::test::ModuleImageBuilder;

    fn temp_module(name: &str, data: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "dotinspect-dispenser-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn open_from_disk_both_backings() {
        let image = ModuleImageBuilder::new("Widgets.Core").build();
        let path = temp_module("Widgets.Core.dll", &image);

        for backing in [Backing::Mapped, Backing::Buffered] {
            let dispenser =
                FileDispenser::with_options(OpenOptions::default().with_backing(backing));
            let scope = dispenser.open(&path, OpenMode::ReadOnly).unwrap();

            assert!(scope.is_open());
            assert_eq!(scope.path(), Some(path.as_path()));
            assert!(scope.get_assembly_token().is_ok());
        }

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_path() {
        let path = Path::new("/nonexistent/dotinspect/Widgets.Core.dll");

        for backing in [Backing::Mapped, Backing::Buffered] {
            let dispenser =
                FileDispenser::with_options(OpenOptions::default().with_backing(backing));
            assert!(matches!(
                dispenser.open(path, OpenMode::ReadOnly),
                Err(OpenError::NotFound(p)) if p == path
            ));
        }
    }

    #[test]
    fn not_managed() {
        let dispenser = FileDispenser::new();

        assert!(matches!(
            dispenser.open_bytes(Vec::new()),
            Err(OpenError::NotAManagedModule(_))
        ));
        assert!(matches!(
            dispenser.open_bytes(b"just some text, no PE here".to_vec()),
            Err(OpenError::NotAManagedModule(_))
        ));
        assert!(matches!(
            dispenser.open_bytes(ModuleImageBuilder::new("Native").without_clr_header().build()),
            Err(OpenError::NotAManagedModule(_))
        ));
    }

    #[test]
    fn empty_file_on_disk() {
        let path = temp_module("empty.dll", &[]);

        assert!(matches!(
            FileDispenser::new().open(&path, OpenMode::ReadOnly),
            Err(OpenError::NotAManagedModule(_))
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_metadata() {
        let image = ModuleImageBuilder::new("Widgets.Core").corrupt_root().build();

        assert!(matches!(
            FileDispenser::new().open_bytes(image),
            Err(OpenError::CorruptMetadata(_))
        ));
    }

    #[test]
    fn validate_on_open() {
        let image = ModuleImageBuilder::new("Widgets.Core").dangling_name().build();

        assert!(FileDispenser::new().open_bytes(image.clone()).is_ok());
        assert!(matches!(
            FileDispenser::with_options(OpenOptions::strict()).open_bytes(image),
            Err(OpenError::CorruptMetadata(_))
        ));
    }
}

//! PE image access for managed modules.
//!
//! [`File`] owns the raw bytes of a module, either memory-mapped from disk through
//! [`physical::Physical`] or held in a buffer through [`memory::Memory`], together with the
//! goblin-parsed PE headers borrowing from them. Construction fails unless the image carries a
//! CLR runtime header data directory, which is what makes it a managed module.
//!
//! Nothing here executes or relocates the image: sections are only used to translate RVAs
//! into file offsets.

pub mod io;
pub mod memory;
pub mod parser;
pub mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr, NotSupported, OutOfBounds},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Backend trait for file data sources.
///
/// Abstracts over where the module bytes live so that [`File`] can parse from a mapped file
/// and from an owned buffer alike.
pub trait Backend: Send + Sync {
    /// Returns a bounds-checked slice of the data.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image that carries a CLR runtime header.
///
/// ```rust,ignore
/// let file = File::from_file(Path::new("Widgets.Core.dll"))?;
/// let (clr_rva, clr_size) = file.clr()?;
/// let clr_offset = file.rva_to_offset(clr_rva)?;
/// let cor20 = file.data_slice(clr_offset, clr_size)?;
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory-maps and parses the module at `file`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, [`crate::Error::Empty`]
    /// for an empty file, [`crate::Error::GoblinErr`] if it is not a PE image, and
    /// [`crate::Error::NotSupported`] if the PE has no CLR runtime header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parses a module that is already in memory.
    ///
    /// # Errors
    ///
    /// Same as [`File::from_file`], minus the I/O failures.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let pe = PE::parse(data.data()).map_err(GoblinErr)?;

            let Some(optional_header) = pe.header.optional_header else {
                return Err(NotSupported);
            };

            if optional_header
                .data_directories
                .get_clr_runtime_header()
                .is_none()
            {
                return Err(NotSupported);
            }

            Ok(pe)
        })
    }

    /// Returns the total size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the image has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw image bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.borrow_data().data()
    }

    /// Returns a bounds-checked slice of the image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the range does not lie within the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.borrow_data().data_slice(offset, len)
    }

    /// Returns the `(rva, size)` of the CLR runtime header.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotSupported`] if the directory is absent.
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            let optional_header = pe.header.optional_header.ok_or(NotSupported)?;
            let Some(clr_dir) = optional_header.data_directories.get_clr_runtime_header() else {
                return Err(NotSupported);
            };

            Ok((clr_dir.virtual_address as usize, clr_dir.size as usize))
        })
    }

    /// Converts a relative virtual address into a file offset using the section table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if no section contains `rva` or a section header
    /// overflows, and [`crate::Error::OutOfBounds`] if the translated offset lies past the end
    /// of the image.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        let offset = self.with_pe(|pe| {
            for section in &pe.sections {
                let span = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(span) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        span
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })?;

        if offset >= self.len() {
            return Err(OutOfBounds);
        }

        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ModuleImageBuilder;

    #[test]
    fn load_synthetic_module() {
        let image = ModuleImageBuilder::new("Widgets.Core").build();
        let file = File::from_mem(image).unwrap();

        let (clr_rva, clr_size) = file.clr().unwrap();
        assert_eq!(clr_size, 72);

        let clr_offset = file.rva_to_offset(clr_rva).unwrap();
        let cb = crate::file::io::read_le::<u32>(file.data_slice(clr_offset, 4).unwrap()).unwrap();
        assert_eq!(cb, 72);
    }

    #[test]
    fn section_start_is_mapped() {
        let image = ModuleImageBuilder::new("Widgets.Core").build();
        let file = File::from_mem(image).unwrap();

        assert_eq!(
            file.rva_to_offset(ModuleImageBuilder::TEXT_RVA as usize).unwrap(),
            ModuleImageBuilder::TEXT_FILE_OFFSET as usize
        );
        assert!(file.rva_to_offset(0x10).is_err());
        assert!(file.rva_to_offset(0x0010_0000).is_err());
    }

    #[test]
    fn empty_input() {
        assert!(matches!(File::from_mem(vec![]), Err(Empty)));
    }

    #[test]
    fn not_a_pe() {
        let data = b"this is plainly not a portable executable image".to_vec();
        assert!(matches!(File::from_mem(data), Err(GoblinErr(_))));
    }

    #[test]
    fn native_pe_without_clr_header() {
        let image = ModuleImageBuilder::new("Native").without_clr_header().build();
        assert!(matches!(File::from_mem(image), Err(NotSupported)));
    }
}

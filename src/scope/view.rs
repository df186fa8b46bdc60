//! The parsed metadata of one open module.
//!
//! [`ModuleImage`] owns the [`File`] and the [`MetadataView`] borrowing from it, so a scope can
//! keep both behind a single value and drop them together.

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        root::Root,
        streams::{Blob, Strings, TablesHeader},
        tables::{
            AssemblyRaw, AssemblyRefRaw, ExportedTypeRaw, FileRaw, ManifestResourceRaw,
            MetadataTable, RowReadable,
        },
    },
    scope::OpenOptions,
    Result,
};

/// Headers, tables and heaps of a module, borrowed from its bytes.
pub(crate) struct MetadataView<'a> {
    pub cor20: Cor20Header,
    pub root: Root,
    pub tables: TablesHeader<'a>,
    strings: Option<Strings<'a>>,
    blobs: Option<Blob<'a>>,
}

impl<'a> MetadataView<'a> {
    /// Walks CLR directory, CLI header, metadata root and streams.
    pub fn parse(file: &'a File, options: &OpenOptions) -> Result<MetadataView<'a>> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20 = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let meta_size = cor20.meta_data_size as usize;
        if meta_size > options.max_metadata_size {
            return Err(malformed_error!(
                "Metadata region of {} bytes exceeds the limit of {}",
                meta_size,
                options.max_metadata_size
            ));
        }

        let meta_offset = file.rva_to_offset(cor20.meta_data_rva as usize)?;
        let meta = file.data_slice(meta_offset, meta_size)?;
        let root = Root::read(meta)?;

        let Some(tables_stream) = root.stream("#~").or_else(|| root.stream("#-")) else {
            return Err(malformed_error!("Metadata has no tables stream"));
        };
        let tables = TablesHeader::from(tables_stream.slice(meta)?)?;

        let strings = match root.stream("#Strings") {
            Some(header) => Some(Strings::from(header.slice(meta)?)?),
            None => None,
        };
        let blobs = match root.stream("#Blob") {
            Some(header) => Some(Blob::from(header.slice(meta)?)?),
            None => None,
        };

        Ok(MetadataView {
            cor20,
            root,
            tables,
            strings,
            blobs,
        })
    }

    /// The table holding `T` rows, if it has any.
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        self.tables.table::<T>()
    }

    /// Copies the `#Strings` entry at `index` into `buffer` if it fits; returns its length.
    pub fn copy_string(&self, index: u32, buffer: &mut [u8]) -> Result<usize> {
        if index == 0 {
            return Ok(0);
        }

        match &self.strings {
            Some(strings) => strings.copy_into(index as usize, buffer),
            None => Err(malformed_error!("String index {} without a #Strings heap", index)),
        }
    }

    /// Reads a `#Strings` entry by probing its length first, then filling an exact buffer.
    pub fn read_string(&self, index: u32) -> Result<String> {
        let required = self.copy_string(index, &mut [])?;

        let mut buffer = vec![0u8; required];
        let written = self.copy_string(index, &mut buffer)?;
        if written != required {
            return Err(malformed_error!(
                "String at index {} changed length between reads",
                index
            ));
        }

        String::from_utf8(buffer)
            .map_err(|_| malformed_error!("Invalid UTF-8 string at index - {}", index))
    }

    /// Like [`MetadataView::read_string`], but `None` for the empty string.
    pub fn read_optional_string(&self, index: u32) -> Result<Option<String>> {
        let value = self.read_string(index)?;
        Ok((!value.is_empty()).then_some(value))
    }

    /// The `#Blob` entry at `index`; empty for index 0.
    pub fn blob(&self, index: u32) -> Result<&'a [u8]> {
        if index == 0 {
            return Ok(&[]);
        }

        match &self.blobs {
            Some(blobs) => blobs.get(index as usize),
            None => Err(malformed_error!("Blob index {} without a #Blob heap", index)),
        }
    }

    /// Owned copy of a `#Blob` entry, `None` when empty.
    pub fn read_optional_blob(&self, index: u32) -> Result<Option<Vec<u8>>> {
        let value = self.blob(index)?;
        Ok((!value.is_empty()).then(|| value.to_vec()))
    }

    /// Decodes every manifest row and resolves each of its heap references.
    pub fn validate(&self) -> Result<()> {
        if let Some(table) = self.table::<AssemblyRaw>() {
            if table.row_count() > 1 {
                return Err(malformed_error!(
                    "Assembly table has {} rows",
                    table.row_count()
                ));
            }
            for rid in 1..=table.row_count() {
                let row = table.try_get(rid)?;
                self.blob(row.public_key)?;
                self.read_string(row.name)?;
                self.read_string(row.culture)?;
            }
        }

        if let Some(table) = self.table::<AssemblyRefRaw>() {
            for rid in 1..=table.row_count() {
                let row = table.try_get(rid)?;
                self.blob(row.public_key_or_token)?;
                self.read_string(row.name)?;
                self.read_string(row.culture)?;
                self.blob(row.hash_value)?;
            }
        }

        if let Some(table) = self.table::<FileRaw>() {
            for rid in 1..=table.row_count() {
                let row = table.try_get(rid)?;
                self.read_string(row.name)?;
                self.blob(row.hash_value)?;
            }
        }

        if let Some(table) = self.table::<ExportedTypeRaw>() {
            for rid in 1..=table.row_count() {
                let row = table.try_get(rid)?;
                self.read_string(row.name)?;
                self.read_string(row.namespace)?;
            }
        }

        if let Some(table) = self.table::<ManifestResourceRaw>() {
            for rid in 1..=table.row_count() {
                let row = table.try_get(rid)?;
                self.read_string(row.name)?;
            }
        }

        Ok(())
    }
}

#[self_referencing]
/// An open module: its bytes and the metadata parsed from them.
pub(crate) struct ModuleImage {
    file: File,
    #[borrows(file)]
    #[not_covariant]
    view: MetadataView<'this>,
}

impl ModuleImage {
    /// Parses the metadata of `file`.
    pub fn load(file: File, options: &OpenOptions) -> Result<ModuleImage> {
        ModuleImage::try_new(file, |file| MetadataView::parse(file, options))
    }

    /// Runs `f` against the parsed metadata.
    pub fn with_metadata<R>(&self, f: impl for<'this> FnOnce(&MetadataView<'this>) -> R) -> R {
        self.with_view(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::tables::TableId, test::ModuleImageBuilder, Error};

    fn load(image: Vec<u8>, options: &OpenOptions) -> Result<ModuleImage> {
        ModuleImage::load(File::from_mem(image)?, options)
    }

    #[test]
    fn parse_synthetic() {
        let image = ModuleImageBuilder::new("Widgets.Core")
            .version(2, 1, 0, 5)
            .reference("System.Runtime", [8, 0, 0, 0])
            .build();
        let module = load(image, &OpenOptions::default()).unwrap();

        module.with_view(|view| {
            assert_eq!(view.cor20.cb, 72);
            assert_eq!(view.root.version, "v4.0.30319");
            assert_eq!(view.tables.table_row_count(TableId::Assembly), 1);
            assert_eq!(view.tables.table_row_count(TableId::AssemblyRef), 1);

            let assembly = view.table::<AssemblyRaw>().unwrap().get(1).unwrap();
            assert_eq!(view.read_string(assembly.name).unwrap(), "Widgets.Core");
            assert_eq!(view.read_optional_string(assembly.culture).unwrap(), None);
            assert_eq!(view.read_optional_blob(assembly.public_key).unwrap(), None);

            let reference = view.table::<AssemblyRefRaw>().unwrap().get(1).unwrap();
            assert_eq!(view.read_string(reference.name).unwrap(), "System.Runtime");

            view.validate().unwrap();
        });
    }

    #[test]
    fn two_phase_string_read() {
        let image = ModuleImageBuilder::new("Widgets.Core").build();
        let module = load(image, &OpenOptions::default()).unwrap();

        module.with_view(|view| {
            let name = view.table::<AssemblyRaw>().unwrap().get(1).unwrap().name;

            let mut small = [0xFFu8; 4];
            assert_eq!(view.copy_string(name, &mut small).unwrap(), 12);
            assert_eq!(small, [0xFF; 4]);

            let mut exact = [0u8; 12];
            assert_eq!(view.copy_string(name, &mut exact).unwrap(), 12);
            assert_eq!(&exact, b"Widgets.Core");
        });
    }

    #[test]
    fn metadata_size_limit() {
        let image = ModuleImageBuilder::new("Widgets.Core").build();
        let options = OpenOptions {
            max_metadata_size: 16,
            ..OpenOptions::default()
        };

        assert!(matches!(load(image, &options), Err(Error::Malformed { .. })));
    }

    #[test]
    fn corrupt_root() {
        let image = ModuleImageBuilder::new("Widgets.Core").corrupt_root().build();
        assert!(matches!(
            load(image, &OpenOptions::default()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn dangling_name_fails_validation() {
        let image = ModuleImageBuilder::new("Widgets.Core").dangling_name().build();
        let module = load(image, &OpenOptions::default()).unwrap();

        module.with_view(|view| {
            assert!(view.validate().is_err());
        });
    }
}

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

/// Heap-size flag: four extra bytes follow the row counts.
const EXTRA_DATA: u8 = 0x40;

/// The header of the `#~` stream and the location of every table inside it.
///
/// Table data is not copied; [`TablesHeader::table`] hands out typed views that borrow from the
/// stream.
///
/// ```rust,ignore
/// let tables = TablesHeader::from(stream)?;
/// if let Some(refs) = tables.table::<AssemblyRefRaw>() {
///     for reference in refs.iter() {
///         println!("{}.{}", reference.major_version, reference.minor_version);
///     }
/// }
/// ```
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.6
pub struct TablesHeader<'a> {
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// Heap index width flags
    pub heap_sizes: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    table_offsets: Vec<Option<usize>>,
}

impl<'a> TablesHeader<'a> {
    /// Parses the `#~` stream `data` and locates each present table.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or any table is truncated, and
    /// [`crate::Error::Malformed`] if no table is present or an unknown one is.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid = read_le::<u64>(&data[8..])?;
        if valid == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let heap_sizes = read_le::<u8>(&data[6..])?;
        let info = Arc::new(TableInfo::new(data, valid, heap_sizes)?);

        let mut current_offset = 24 + valid.count_ones() as usize * 4;
        if heap_sizes & EXTRA_DATA == EXTRA_DATA {
            current_offset += 4;
        }

        let mut table_offsets = vec![None; TableId::SLOTS];
        for table_id in TableId::iter() {
            let rows = info.rows(table_id);
            if rows == 0 {
                continue;
            }

            let Some(size) = (rows as usize).checked_mul(info.row_size(table_id) as usize) else {
                return Err(OutOfBounds);
            };
            let Some(end) = current_offset.checked_add(size) else {
                return Err(OutOfBounds);
            };
            if end > data.len() {
                return Err(OutOfBounds);
            }

            table_offsets[table_id as usize] = Some(current_offset);
            current_offset = end;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            heap_sizes,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data,
            table_offsets,
        })
    }

    /// Number of tables present.
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// A typed view over the table holding `T` rows; `None` when the table has no rows.
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let start = self.table_offsets[T::TABLE_ID as usize]?;

        MetadataTable::new(
            &self.data[start..],
            self.info.rows(T::TABLE_ID),
            self.info.clone(),
        )
        .ok()
    }

    /// Returns `true` if `table_id` is marked present.
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        (self.valid & (1u64 << (table_id as u8))) != 0
    }

    /// Row count of `table_id`; 0 when absent.
    #[must_use]
    pub fn table_row_count(&self, table_id: TableId) -> u32 {
        self.info.rows(table_id)
    }

    /// Iterates the present tables in id order.
    pub fn present_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        TableId::iter().filter(|&table_id| self.has_table(table_id))
    }
}

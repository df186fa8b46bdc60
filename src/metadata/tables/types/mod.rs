//! Generic table machinery: ids, index widths, coded indexes and typed row access.

mod codedindex;
mod tableid;
mod tableinfo;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

use std::marker::PhantomData;

use crate::{Error::OutOfBounds, Result};

/// A row type that can be decoded from a table's bytes.
pub trait RowReadable: Sized {
    /// The table this row type belongs to.
    const TABLE_ID: TableId;

    /// Decodes the row with id `rid` at `offset`, advancing `offset` past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row is truncated.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Typed, random-access view over the rows of one table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Wraps `data`, which must hold at least `row_count` rows.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than the table.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = sizes.row_size(T::TABLE_ID);

        let Some(table_size) = (row_count as usize).checked_mul(row_size as usize) else {
            return Err(OutOfBounds);
        };
        if table_size > data.len() {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data: &data[..table_size],
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Size of one row in bytes.
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Decodes the row with 1-based id `rid`; `None` if out of range or undecodable.
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        self.try_get(rid).ok()
    }

    /// Decodes the row with 1-based id `rid`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for a rid outside `1..=row_count`, or the row
    /// reader's error for an undecodable row.
    pub fn try_get(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(OutOfBounds);
        }

        let mut offset = (rid - 1) as usize * self.row_size as usize;
        T::row_read(self.data, &mut offset, rid, &self.sizes)
    }

    /// Iterates all rows in rid order.
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            next_rid: 1,
        }
    }
}

/// Iterator over the rows of a [`MetadataTable`].
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    next_rid: u32,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_rid > self.table.row_count {
            return None;
        }

        let row = self.table.get(self.next_rid);
        self.next_rid += 1;
        row
    }
}

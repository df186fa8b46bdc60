use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{FileRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for FileRaw {
    const TABLE_ID: TableId = TableId::File;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FileRaw {
            rid,
            token: Token::from_parts(TableId::File, rid),
            offset: *offset,
            flags: read_le_at::<u32>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            hash_value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{FileAttributes, MetadataTable, TableInfo};

    #[test]
    fn crafted_short() {
        let data = vec![
            0x01, 0x00, 0x00, 0x00, // flags
            0x02, 0x02, // name
            0x03, 0x03, // hash_value
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::File, 1)], false, false, false));
        let table = MetadataTable::<FileRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x26000001);
        assert!(FileAttributes::from_bits_retain(row.flags)
            .contains(FileAttributes::CONTAINS_NO_METADATA));
        assert_eq!(row.name, 0x0202);
        assert_eq!(row.hash_value, 0x0303);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x00, 0x00, 0x00, 0x00, // flags
            0x02, 0x02, 0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // hash_value
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::File, 1)], true, true, true));
        let table = MetadataTable::<FileRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.flags, 0);
        assert_eq!(row.name, 0x02020202);
        assert_eq!(row.hash_value, 0x03030303);
    }
}

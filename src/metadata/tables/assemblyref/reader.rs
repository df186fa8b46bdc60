use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{AssemblyRefRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for AssemblyRefRaw {
    const TABLE_ID: TableId = TableId::AssemblyRef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRefRaw {
            rid,
            token: Token::from_parts(TableId::AssemblyRef, rid),
            offset: *offset,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key_or_token: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            hash_value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_short() {
        let data = vec![
            0x04, 0x00, // major_version
            0x00, 0x00, // minor_version
            0x00, 0x00, // build_number
            0x00, 0x00, // revision_number
            0x00, 0x00, 0x00, 0x00, // flags
            0x01, 0x00, // public_key_or_token
            0x02, 0x00, // name
            0x00, 0x00, // culture
            0x00, 0x00, // hash_value
            0x08, 0x00, // major_version
            0x00, 0x00, // minor_version
            0x00, 0x00, // build_number
            0x00, 0x00, // revision_number
            0x01, 0x00, 0x00, 0x00, // flags
            0x0A, 0x00, // public_key_or_token
            0x0B, 0x00, // name
            0x0C, 0x00, // culture
            0x0D, 0x00, // hash_value
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::AssemblyRef, 2)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<AssemblyRefRaw>::new(&data, 2, sizes).unwrap();

        let rows: Vec<AssemblyRefRaw> = table.iter().collect();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].token.value(), 0x23000001);
        assert_eq!(rows[0].major_version, 4);
        assert_eq!(rows[0].public_key_or_token, 1);
        assert_eq!(rows[0].name, 2);

        assert_eq!(rows[1].token.value(), 0x23000002);
        assert_eq!(rows[1].offset, 20);
        assert_eq!(rows[1].major_version, 8);
        assert_eq!(rows[1].flags, 1);
        assert_eq!(rows[1].culture, 0x0C);
        assert_eq!(rows[1].hash_value, 0x0D);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, // major_version
            0x02, 0x02, // minor_version
            0x03, 0x03, // build_number
            0x04, 0x04, // revision_number
            0x05, 0x05, 0x05, 0x05, // flags
            0x06, 0x06, 0x06, 0x06, // public_key_or_token
            0x07, 0x07, 0x07, 0x07, // name
            0x08, 0x08, 0x08, 0x08, // culture
            0x09, 0x09, 0x09, 0x09, // hash_value
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::AssemblyRef, 1)],
            true,
            true,
            true,
        ));
        let table = MetadataTable::<AssemblyRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.revision_number, 0x0404);
        assert_eq!(row.public_key_or_token, 0x06060606);
        assert_eq!(row.hash_value, 0x09090909);
    }
}

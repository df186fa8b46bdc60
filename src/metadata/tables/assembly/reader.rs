use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{AssemblyRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for AssemblyRaw {
    const TABLE_ID: TableId = TableId::Assembly;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            token: Token::from_parts(TableId::Assembly, rid),
            offset: *offset,
            hash_alg_id: read_le_at::<u32>(data, offset)?,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
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
            0x04, 0x80, 0x00, 0x00, // hash_alg_id
            0x02, 0x00, // major_version
            0x01, 0x00, // minor_version
            0x00, 0x00, // build_number
            0x05, 0x00, // revision_number
            0x01, 0x00, 0x00, 0x00, // flags
            0x07, 0x07, // public_key
            0x08, 0x08, // name
            0x09, 0x09, // culture
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).unwrap();
        assert_eq!(table.row_size() as usize, data.len());

        let eval = |row: AssemblyRaw| {
            assert_eq!(row.rid, 1);
            assert_eq!(row.token.value(), 0x20000001);
            assert_eq!(row.hash_alg_id, 0x8004);
            assert_eq!(row.major_version, 2);
            assert_eq!(row.minor_version, 1);
            assert_eq!(row.build_number, 0);
            assert_eq!(row.revision_number, 5);
            assert_eq!(row.flags, 0x0001);
            assert_eq!(row.public_key, 0x0707);
            assert_eq!(row.name, 0x0808);
            assert_eq!(row.culture, 0x0909);
        };

        for row in table.iter() {
            eval(row);
        }

        eval(table.get(1).unwrap());
        assert!(table.get(0).is_none());
        assert!(table.get(2).is_none());
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, 0x01, 0x01, // hash_alg_id
            0x02, 0x02, // major_version
            0x03, 0x03, // minor_version
            0x04, 0x04, // build_number
            0x05, 0x05, // revision_number
            0x06, 0x06, 0x06, 0x06, // flags
            0x07, 0x07, 0x07, 0x07, // public_key
            0x08, 0x08, 0x08, 0x08, // name
            0x09, 0x09, 0x09, 0x09, // culture
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            true,
            true,
            true,
        ));
        let table = MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.hash_alg_id, 0x01010101);
        assert_eq!(row.major_version, 0x0202);
        assert_eq!(row.revision_number, 0x0505);
        assert_eq!(row.flags, 0x06060606);
        assert_eq!(row.public_key, 0x07070707);
        assert_eq!(row.name, 0x08080808);
        assert_eq!(row.culture, 0x09090909);
    }

    #[test]
    fn truncated() {
        let data = vec![0x00; 21];
        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            false,
            false,
            false,
        ));

        assert!(MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).is_err());
    }
}

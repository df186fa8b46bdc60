use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{
            CodedIndex, CodedIndexType, ManifestResourceRaw, RowReadable, TableId, TableInfoRef,
        },
        token::Token,
    },
    Result,
};

impl RowReadable for ManifestResourceRaw {
    const TABLE_ID: TableId = TableId::ManifestResource;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let row_offset = *offset;
        let offset_field = read_le_at::<u32>(data, offset)?;
        let flags = read_le_at::<u32>(data, offset)?;
        let name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let implementation = CodedIndex::decode(
            read_le_at_dyn(
                data,
                offset,
                sizes.is_large_coded(CodedIndexType::Implementation),
            )?,
            CodedIndexType::Implementation,
        )?;

        Ok(ManifestResourceRaw {
            rid,
            token: Token::from_parts(TableId::ManifestResource, rid),
            offset: row_offset,
            offset_field,
            flags,
            name,
            implementation,
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
            0x10, 0x00, 0x00, 0x00, // offset
            0x01, 0x00, 0x00, 0x00, // flags
            0x03, 0x03, // name
            0x00, 0x00, // implementation (nil: embedded)
            0x00, 0x00, 0x00, 0x00, // offset
            0x02, 0x00, 0x00, 0x00, // flags
            0x04, 0x00, // name
            0x05, 0x00, // implementation (tag 1 = AssemblyRef, row 1)
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::ManifestResource, 2), (TableId::AssemblyRef, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<ManifestResourceRaw>::new(&data, 2, sizes).unwrap();

        let embedded = table.get(1).unwrap();
        assert_eq!(embedded.token.value(), 0x28000001);
        assert_eq!(embedded.offset_field, 0x10);
        assert_eq!(embedded.flags, 1);
        assert_eq!(embedded.name, 0x0303);
        assert!(embedded.implementation.is_null());

        let linked = table.get(2).unwrap();
        assert_eq!(linked.flags, 2);
        assert_eq!(linked.implementation.tag, TableId::AssemblyRef);
        assert_eq!(linked.implementation.row, 1);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, 0x01, 0x01, // offset
            0x02, 0x02, 0x02, 0x02, // flags
            0x03, 0x03, 0x03, 0x03, // name
            0x08, 0x00, 0x00, 0x00, // implementation (tag 0 = File, row 2)
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::ManifestResource, 1), (TableId::AssemblyRef, u16::MAX as u32 + 3)],
            true,
            true,
            true,
        ));
        let table = MetadataTable::<ManifestResourceRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.offset_field, 0x01010101);
        assert_eq!(row.flags, 0x02020202);
        assert_eq!(row.name, 0x03030303);
        assert_eq!(row.implementation.tag, TableId::File);
        assert_eq!(row.implementation.row, 2);
    }
}

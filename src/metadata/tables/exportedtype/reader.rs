use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{
            CodedIndex, CodedIndexType, ExportedTypeRaw, RowReadable, TableId, TableInfoRef,
        },
        token::Token,
    },
    Result,
};

impl RowReadable for ExportedTypeRaw {
    const TABLE_ID: TableId = TableId::ExportedType;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let row_offset = *offset;
        let flags = read_le_at::<u32>(data, offset)?;
        let type_def_id = read_le_at::<u32>(data, offset)?;
        let name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let namespace = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let implementation = CodedIndex::decode(
            read_le_at_dyn(
                data,
                offset,
                sizes.is_large_coded(CodedIndexType::Implementation),
            )?,
            CodedIndexType::Implementation,
        )?;

        Ok(ExportedTypeRaw {
            rid,
            token: Token::from_parts(TableId::ExportedType, rid),
            offset: row_offset,
            flags,
            type_def_id,
            name,
            namespace,
            implementation,
        })
    }
}

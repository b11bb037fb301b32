//! Column descriptor table parsing.
//!
//! Descriptors start right after the fixed header and run until a `0x0D`
//! terminator byte. The descriptor shape depends on the version:
//!
//! | version   | size | name | length / decimal                 |
//! |-----------|------|------|----------------------------------|
//! | `02`      | 16   | 11   | length at 12, decimal fixed at 0 |
//! | `04`,`8c` | 48   | 32   | length at 33, decimal at 34      |
//! | others    | 32   | 11   | length at 16, decimal at 17      |

use std::io::{Read, Seek, SeekFrom};

use log::{debug, info};

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{
    Column, ColumnType, DESCRIPTOR_TERMINATOR, DescriptorLayout, Header,
};
use crate::dbf::utils;

/// Parses every column descriptor of the table.
///
/// The reader's position is restored before returning, whether or not
/// parsing succeeds.
pub fn parse<R: Read + Seek>(reader: &mut R, header: &Header) -> Result<Vec<Column>> {
    utils::with_restored_position(reader, |reader| {
        reader.seek(SeekFrom::Start(header.version.descriptor_start()))?;
        read_descriptors(reader, header.version.descriptor_layout())
    })
}

fn read_descriptors<R: Read>(reader: &mut R, layout: DescriptorLayout) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    let mut record_offset = 1usize;
    let mut buf = vec![0u8; layout.size()];

    loop {
        let mut first = [0u8; 1];
        if utils::read_up_to(reader, &mut first)? == 0 {
            return Err(DbfError::InvalidFormat(
                "Column descriptor table is not terminated".to_string(),
            ));
        }
        if first[0] == DESCRIPTOR_TERMINATOR {
            break;
        }

        buf[0] = first[0];
        let found = utils::read_up_to(reader, &mut buf[1..])? + 1;
        if found < buf.len() {
            return Err(DbfError::InvalidFormat(format!(
                "Column descriptor #{} is truncated: expected {} bytes, found {}",
                columns.len(),
                buf.len(),
                found
            )));
        }

        let column = parse_descriptor(&buf, layout, columns.len(), record_offset)?;
        debug!(
            "Column #{}: name={}, type={}, length={}, decimal={}, offset={}",
            columns.len(),
            column.name,
            column.column_type,
            column.length,
            column.decimal,
            column.record_offset
        );
        record_offset += column.length as usize;
        columns.push(column);
    }

    info!("Parsed {} column descriptors", columns.len());
    Ok(columns)
}

/// Decodes one descriptor into a [`Column`].
pub fn parse_descriptor(
    buf: &[u8],
    layout: DescriptorLayout,
    index: usize,
    record_offset: usize,
) -> Result<Column> {
    let name_width = layout.name_width();
    let (type_code, length, decimal) = match layout {
        DescriptorLayout::FoxBase => (buf[11], buf[12], 0),
        DescriptorLayout::Dbase7 => (buf[32], buf[33], buf[34]),
        DescriptorLayout::Standard => (buf[11], buf[16], buf[17]),
    };

    let name = clean_name(&buf[..name_width]);
    if name.is_empty() {
        return Err(DbfError::InvalidColumn {
            index,
            reason: "column name is empty".to_string(),
        });
    }
    if length == 0 {
        return Err(DbfError::InvalidColumn {
            index,
            reason: format!("column {} has zero length", name),
        });
    }

    Ok(Column {
        name,
        column_type: ColumnType::from(type_code),
        length: length as u16,
        decimal,
        record_offset,
    })
}

/// Truncates at the first NUL and drops anything outside printable ASCII.
pub fn clean_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    raw[..end]
        .iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b))
        .map(|&b| b as char)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Checks that the columns plus the deletion flag fill the declared record length.
pub fn validate_record_length(header: &Header, columns: &[Column]) -> Result<()> {
    let computed: u32 = 1 + columns.iter().map(|c| c.length as u32).sum::<u32>();
    if computed != header.record_length as u32 {
        return Err(DbfError::RecordLengthMismatch {
            declared: header.record_length,
            computed,
        });
    }
    Ok(())
}

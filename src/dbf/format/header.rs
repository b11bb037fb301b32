//! Table header parsing.
//!
//! # Header Structure
//! ```text
//! FoxBase (02):
//! [1 byte]  Version
//! [2 bytes] Record count (little-endian u16)
//! [3 bytes] Last update
//! [2 bytes] Record length (little-endian u16)
//!
//! dBase III and later:
//! [1 byte]  Version
//! [3 bytes] Last update (YY MM DD)
//! [4 bytes] Record count (little-endian u32)
//! [2 bytes] Header length (little-endian u16)
//! [2 bytes] Record length (little-endian u16)
//! [17 bytes] Reserved
//! [1 byte]  Code page marker
//! [2 bytes] Reserved
//! ```

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info, trace};

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{
    DBASE2_HEADER_LENGTH, DBASE2_HEADER_SIZE, DBF_HEADER_SIZE, Header, Version,
};
use crate::dbf::utils;

/// Reads and parses the header from a reader positioned at the start of a table.
pub fn parse<R: Read>(reader: &mut R) -> Result<Header> {
    let mut buf = [0u8; DBF_HEADER_SIZE];
    let found = utils::read_up_to(reader, &mut buf)?;
    trace!("Read {} header bytes", found);
    parse_bytes(&buf[..found])
}

/// Parses a header from raw bytes.
///
/// Fails with [`DbfError::TruncatedHeader`] when fewer bytes are present than
/// the version's layout needs.
pub fn parse_bytes(data: &[u8]) -> Result<Header> {
    let Some(&code) = data.first() else {
        return Err(DbfError::TruncatedHeader {
            expected: DBF_HEADER_SIZE,
            found: 0,
        });
    };
    let version = Version(code);

    let header = if version == Version::FOXBASE {
        ensure_len(data, DBASE2_HEADER_SIZE as usize)?;
        Header {
            version,
            record_count: LittleEndian::read_u16(&data[1..3]) as u32,
            header_length: DBASE2_HEADER_LENGTH,
            record_length: LittleEndian::read_u16(&data[6..8]),
            encoding_key: None,
        }
    } else {
        ensure_len(data, DBF_HEADER_SIZE)?;
        Header {
            version,
            record_count: LittleEndian::read_u32(&data[4..8]),
            header_length: LittleEndian::read_u16(&data[8..10]),
            record_length: LittleEndian::read_u16(&data[10..12]),
            encoding_key: Some(data[29]),
        }
    };

    if header.header_length == 0 || header.record_length == 0 {
        return Err(DbfError::InvalidFormat(format!(
            "Header declares header_length={} and record_length={}; both must be positive",
            header.header_length, header.record_length
        )));
    }

    match version.description() {
        Some(name) => debug!("Version {} ({})", version, name),
        None => debug!(
            "Version {} is not a known dialect; decoding with the dBase III layout",
            version
        ),
    }
    info!(
        "Header parsed: version={}, records={}, header_length={}, record_length={}, code_page={:?}",
        version,
        header.record_count,
        header.header_length,
        header.record_length,
        header.encoding_key.map(|k| format!("{:#04x}", k))
    );
    Ok(header)
}

fn ensure_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(DbfError::TruncatedHeader {
            expected,
            found: data.len(),
        });
    }
    Ok(())
}

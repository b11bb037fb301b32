//! dBase IV `.dbt` memos: an 8-byte block header whose bytes 4..8 hold the
//! little-endian content length, followed by that many content bytes.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;

use super::{DBT_BLOCK_SIZE, block_offset};
use crate::dbf::types::error::Result;
use crate::dbf::utils;

pub fn read<R: Read + Seek>(reader: &mut R, start_block: u32) -> Result<Option<Vec<u8>>> {
    reader.seek(SeekFrom::Start(block_offset(start_block, DBT_BLOCK_SIZE)))?;

    let _signature = reader.read_u32::<LittleEndian>()?;
    let length = reader.read_u32::<LittleEndian>()?;
    let memo = utils::read_exact_vec(reader, length as u64)?;

    trace!("dBase IV memo at block {}: {} bytes", start_block, memo.len());
    Ok(Some(memo))
}

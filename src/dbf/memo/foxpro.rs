//! FoxPro `.fpt` memos.
//!
//! ```text
//! File header (512 bytes):
//! [4 bytes] Next free block (big-endian u32)
//! [2 bytes] Unused
//! [2 bytes] Block size (big-endian u16)
//! [504 bytes] Unused
//!
//! Memo block:
//! [4 bytes] Block type (big-endian u32, 1 = text)
//! [4 bytes] Content length (big-endian u32)
//! [N bytes] Content, continuing into following blocks without further headers
//! ```

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder};
use log::{trace, warn};

use super::block_offset;
use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::utils;

pub const FPT_HEADER_SIZE: usize = 512;
pub const BLOCK_HEADER_SIZE: usize = 8;
const TEXT_BLOCK: u32 = 1;

/// Reads the block size from the `.fpt` header, leaving the position unchanged.
///
/// A missing or zero block size is rejected: every block offset would
/// collapse onto the file header.
pub fn read_block_size<R: Read + Seek>(reader: &mut R) -> Result<u32> {
    utils::with_restored_position(reader, |reader| {
        reader.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; FPT_HEADER_SIZE];
        let found = utils::read_up_to(reader, &mut header)?;
        if found < 8 {
            return Err(DbfError::InvalidFormat(format!(
                "FoxPro memo header is truncated: {} bytes",
                found
            )));
        }
        let block_size = BigEndian::read_u16(&header[6..8]) as u32;
        if block_size == 0 {
            return Err(DbfError::InvalidFormat(
                "FoxPro memo header declares a zero block size".to_string(),
            ));
        }
        trace!("FoxPro memo block size: {}", block_size);
        Ok(block_size)
    })
}

pub fn read<R: Read + Seek>(
    reader: &mut R,
    start_block: u32,
    block_size: u32,
) -> Result<Option<Vec<u8>>> {
    reader.seek(SeekFrom::Start(block_offset(start_block, block_size)))?;

    let mut header = [0u8; BLOCK_HEADER_SIZE];
    let found = utils::read_up_to(reader, &mut header)?;
    if found < BLOCK_HEADER_SIZE {
        warn!("Memo block {} lies beyond the end of the memo file", start_block);
        return Ok(None);
    }

    let block_type = BigEndian::read_u32(&header[0..4]);
    let content_length = BigEndian::read_u32(&header[4..8]);
    if block_type != TEXT_BLOCK || content_length == 0 {
        trace!(
            "Skipping memo block {}: type={}, length={}",
            start_block, block_type, content_length
        );
        return Ok(None);
    }

    let first_block_capacity = (block_size as usize).saturating_sub(BLOCK_HEADER_SIZE);
    if content_length as usize > first_block_capacity {
        trace!(
            "Memo block {} spans {} bytes past its first block",
            start_block,
            content_length as usize - first_block_capacity
        );
    }
    // Content is contiguous across block boundaries.
    let memo = utils::read_exact_vec(reader, content_length as u64)?;
    Ok(Some(memo))
}

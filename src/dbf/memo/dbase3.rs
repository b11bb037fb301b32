//! dBase III `.dbt` memos: fixed 512-byte blocks without a length field.
//!
//! Content runs across successive blocks. NUL and SUB (0x1A) padding is
//! stripped from each block, and the first block whose stripped content is
//! shorter than 512 bytes ends the memo (its content is kept).

use std::io::{Read, Seek, SeekFrom};

use log::{trace, warn};

use super::{DBT_BLOCK_SIZE, block_offset};
use crate::dbf::types::error::Result;
use crate::dbf::utils;

const SUB: u8 = 0x1A;

pub fn read<R: Read + Seek>(reader: &mut R, start_block: u32) -> Result<Option<Vec<u8>>> {
    reader.seek(SeekFrom::Start(block_offset(start_block, DBT_BLOCK_SIZE)))?;

    let mut memo = Vec::new();
    let mut chunk = vec![0u8; DBT_BLOCK_SIZE as usize];
    loop {
        let found = utils::read_up_to(reader, &mut chunk)?;
        if found == 0 && memo.is_empty() {
            warn!("Memo block {} lies beyond the end of the memo file", start_block);
            return Ok(None);
        }
        let before = memo.len();
        memo.extend(chunk[..found].iter().copied().filter(|&b| b != 0 && b != SUB));
        if memo.len() - before < DBT_BLOCK_SIZE as usize {
            break;
        }
    }

    trace!("dBase III memo at block {}: {} bytes", start_block, memo.len());
    Ok(Some(memo))
}

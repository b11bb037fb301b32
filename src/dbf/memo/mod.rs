//! # Memo Stores
//!
//! Memo fields hold only a starting block number; the content lives in a
//! companion `.dbt` or `.fpt` file. Three incompatible layouts exist:
//!
//! - [`MemoKind::Dbase3`]: 512-byte blocks scanned until a short chunk
//! - [`MemoKind::Dbase4`]: 512-byte blocks with an 8-byte length header
//! - [`MemoKind::FoxPro`]: declared block size, big-endian type/length header
//!
//! The variant is picked from the table version and dispatched through
//! [`MemoStore::get`].

use std::path::Path;

use log::{debug, info, trace};

use crate::dbf::reader::DataSource;
use crate::dbf::types::error::Result;
use crate::dbf::types::models::Version;
use crate::dbf::utils;

pub mod dbase3;
pub mod dbase4;
pub mod foxpro;

/// Block size of `.dbt` memo files.
pub const DBT_BLOCK_SIZE: u32 = 512;

/// The memo layout of a store, with any state discovered at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoKind {
    Dbase3,
    Dbase4,
    FoxPro { block_size: u32 },
}

impl MemoKind {
    /// Block size in bytes.
    pub fn block_size(&self) -> u32 {
        match self {
            MemoKind::Dbase3 | MemoKind::Dbase4 => DBT_BLOCK_SIZE,
            MemoKind::FoxPro { block_size } => *block_size,
        }
    }
}

/// An open memo file bound to one memo layout.
pub struct MemoStore {
    source: Box<dyn DataSource>,
    kind: MemoKind,
}

impl std::fmt::Debug for MemoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MemoStore").field("kind", &self.kind).finish()
    }
}

impl MemoStore {
    /// Opens the memo file at `path` for a table of the given version.
    pub fn open(path: impl AsRef<Path>, version: Version) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening memo file: {}", path.display());
        let file = utils::open_file(path)?;
        Self::from_reader(Box::new(file), version)
    }

    /// Wraps an already open memo source.
    ///
    /// FoxPro stores read their block size from the `.fpt` header here.
    pub fn from_reader(mut source: Box<dyn DataSource>, version: Version) -> Result<Self> {
        let kind = if version.is_foxpro() {
            let block_size = foxpro::read_block_size(&mut source)?;
            MemoKind::FoxPro { block_size }
        } else if version == Version::DBASE3_MEMO {
            MemoKind::Dbase3
        } else {
            MemoKind::Dbase4
        };
        debug!("Memo store for version {}: {:?}", version, kind);
        Ok(Self { source, kind })
    }

    pub fn kind(&self) -> MemoKind {
        self.kind
    }

    pub fn block_size(&self) -> u32 {
        self.kind.block_size()
    }

    /// Reads the memo starting at `start_block`.
    ///
    /// Block 0 means "no memo" and returns `None` without touching the file.
    pub fn get(&mut self, start_block: u32) -> Result<Option<Vec<u8>>> {
        if start_block == 0 {
            return Ok(None);
        }
        trace!("Reading memo block {} ({:?})", start_block, self.kind);
        match self.kind {
            MemoKind::Dbase3 => dbase3::read(&mut self.source, start_block),
            MemoKind::Dbase4 => dbase4::read(&mut self.source, start_block),
            MemoKind::FoxPro { block_size } => {
                foxpro::read(&mut self.source, start_block, block_size)
            }
        }
    }
}

/// Byte offset of a block, computed in 64 bits.
fn block_offset(start_block: u32, block_size: u32) -> u64 {
    start_block as u64 * block_size as u64
}

use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use byteorder::ReadBytesExt;
use log::{debug, info, trace};

use super::codec::field::DecodeContext;
use super::codec::text::{self, TextEncoding};
use super::format::{columns, header, record};
use super::iter::RecordIterator;
use super::memo::MemoStore;
use super::types::error::{DbfError, Result};
use super::types::models::{Column, DELETED_MARKER, Header, Version};
use super::types::record::Record;
use super::utils;

/// Anything a table or memo file can be read from.
pub trait DataSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> DataSource for T {}

struct Handles {
    data: Box<dyn DataSource>,
    memo: Option<MemoStore>,
}

/// An open dBase, FoxPro or Visual FoxPro table.
///
/// The header and column descriptors are parsed once when the table is
/// opened. Every call to [`record`](Self::record) re-reads and re-decodes
/// from the underlying source; nothing is cached.
///
/// Reads seek a shared cursor, so access is serialized through a mutex.
pub struct Table {
    path: Option<PathBuf>,
    pub header: Header,
    columns: Vec<Column>,
    encoding: TextEncoding,
    has_memo: bool,
    handles: Mutex<Option<Handles>>,
}

impl Table {
    /// Opens a table file from the given path.
    ///
    /// Text encoding priority (highest → lowest):
    /// 1. `user_encoding` (explicit override provided by caller/CLI)
    /// 2. The code page marker in the table header
    /// 3. UTF-8
    ///
    /// # Arguments
    /// * `path` - File path to the `.dbf` table
    /// * `memo_path` - Optional memo file; when `None`, a `.dbt`/`.fpt` file
    ///   with the same base name is looked up next to the table
    /// * `user_encoding` - Optional encoding label, e.g. `"cp1252"` or `"gbk"`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The table or an explicitly given memo file does not exist
    /// - The header or column descriptors are truncated or malformed
    /// - Column lengths do not add up to the header's record length
    /// - `user_encoding` is not a known label
    pub fn new(
        path: impl AsRef<Path>,
        memo_path: Option<&Path>,
        user_encoding: Option<&str>,
    ) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening table: {}", path.display());
        let file = utils::open_file(path)?;

        Self::load(
            Box::new(file),
            Some(path.to_path_buf()),
            user_encoding,
            |version| {
                let memo_path = match memo_path {
                    Some(p) => Some(p.to_path_buf()),
                    None => find_memo_file(path, version),
                };
                memo_path
                    .map(|p| MemoStore::open(p, version))
                    .transpose()
            },
        )
    }

    /// Opens a table held in memory, with an optional in-memory memo file.
    pub fn from_bytes(
        data: Vec<u8>,
        memo: Option<Vec<u8>>,
        user_encoding: Option<&str>,
    ) -> Result<Self> {
        Self::from_reader(
            Cursor::new(data),
            memo.map(|m| Box::new(Cursor::new(m)) as Box<dyn DataSource>),
            user_encoding,
        )
    }

    /// Opens a table from any seekable source.
    pub fn from_reader(
        data: impl DataSource + 'static,
        memo: Option<Box<dyn DataSource>>,
        user_encoding: Option<&str>,
    ) -> Result<Self> {
        Self::load(Box::new(data), None, user_encoding, |version| {
            memo.map(|m| MemoStore::from_reader(m, version)).transpose()
        })
    }

    fn load(
        mut data: Box<dyn DataSource>,
        path: Option<PathBuf>,
        user_encoding: Option<&str>,
        open_memo: impl FnOnce(Version) -> Result<Option<MemoStore>>,
    ) -> Result<Self> {
        let user_encoding = user_encoding.map(text::parse_encoding).transpose()?;

        let header = utils::with_restored_position(&mut data, |data| {
            data.seek(SeekFrom::Start(0))?;
            header::parse(data)
        })?;
        let columns = columns::parse(&mut data, &header)?;
        columns::validate_record_length(&header, &columns)?;

        let encoding = text::resolve(user_encoding, header.encoding_key);
        let memo = open_memo(header.version)?;
        let has_memo = memo.is_some();

        info!(
            "Table opened: version={}, {} records, {} columns, encoding={}, memo={}",
            header.version,
            header.record_count,
            columns.len(),
            encoding.name(),
            memo.as_ref().map_or("none".to_string(), |m| format!("{:?}", m.kind()))
        );

        Ok(Self {
            path,
            header,
            columns,
            encoding,
            has_memo,
            handles: Mutex::new(Some(Handles { data, memo })),
        })
    }

    /// Reads and decodes the record at `index`.
    ///
    /// Returns `Ok(None)` when the record is flagged as deleted.
    pub fn record(&self, index: u32) -> Result<Option<Record>> {
        if self.columns.is_empty() {
            return Err(DbfError::NoColumns);
        }
        if index >= self.header.record_count {
            return Err(DbfError::RecordOutOfRange {
                index,
                count: self.header.record_count,
            });
        }

        let mut guard = self.handles.lock().map_err(|_| DbfError::LockPoisoned)?;
        let handles = guard.as_mut().ok_or(DbfError::Closed)?;

        let offset = self.header.header_length as u64
            + index as u64 * self.header.record_length as u64;
        handles.data.seek(SeekFrom::Start(offset))?;

        if handles.data.read_u8()? == DELETED_MARKER {
            trace!("Record {} is deleted", index);
            return Ok(None);
        }

        let mut body = vec![0u8; self.header.record_length as usize - 1];
        handles.data.read_exact(&mut body)?;
        trace!("Decoding record {} at offset {}", index, offset);

        let ctx = DecodeContext {
            version: self.header.version,
            encoding: self.encoding,
        };
        record::decode(&body, &self.columns, handles.memo.as_mut(), &ctx).map(Some)
    }

    /// Iterates over every record slot in file order.
    ///
    /// Deleted records yield `Ok(None)`; callers should skip them.
    pub fn iter(&self) -> RecordIterator<'_> {
        RecordIterator::new(self)
    }

    /// Convenience method: all non-deleted records.
    ///
    /// Decodes the whole table into memory.
    pub fn records(&self) -> Result<Vec<Record>> {
        self.iter().filter_map(Result::transpose).collect()
    }

    /// Releases the table and memo handles. Later reads fail with
    /// [`DbfError::Closed`].
    pub fn close(&self) -> Result<()> {
        let mut guard = self.handles.lock().map_err(|_| DbfError::LockPoisoned)?;
        if guard.take().is_some() {
            debug!("Table closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.handles.lock().map_or(true, |guard| guard.is_none())
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    pub fn record_count(&self) -> u32 {
        self.header.record_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds a column by name, ignoring ASCII case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a memo file was opened alongside the table.
    pub fn has_memo(&self) -> bool {
        self.has_memo
    }

    /// The encoding used for character and memo text.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The table's path, if it was opened from a file.
    pub fn filename(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("path", &self.path)
            .field("header", &self.header)
            .field("columns", &self.columns.len())
            .field("encoding", &self.encoding.name())
            .field("has_memo", &self.has_memo)
            .finish()
    }
}

/// Looks for `<stem>.fpt` or `<stem>.dbt` next to the table, ignoring the
/// extension's case. The extension matching the version's memo format wins.
fn find_memo_file(table_path: &Path, version: Version) -> Option<PathBuf> {
    let stem = table_path.file_stem()?;
    let dir = match table_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let preferred = if version.is_foxpro() { "fpt" } else { "dbt" };

    let mut candidates: Vec<(bool, PathBuf)> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.file_stem() == Some(stem))
        .filter_map(|p| {
            let ext = p.extension()?.to_str()?.to_ascii_lowercase();
            (ext == "fpt" || ext == "dbt").then(|| (ext != preferred, p))
        })
        .collect();
    candidates.sort();

    let found = candidates.into_iter().next().map(|(_, p)| p);
    if let Some(p) = &found {
        debug!("Found memo file {}", p.display());
    }
    found
}

//! Low-level byte reading utilities

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::dbf::types::error::{DbfError, Result};

/// Reads until `buf` is full or the reader reports end of file.
///
/// Returns the number of bytes actually read. Unlike `read_exact`, a short
/// count is not an error; callers decide what truncation means.
pub fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads exactly `len` bytes without allocating `len` up front.
///
/// Lengths come from untrusted headers, so the buffer grows with the data
/// actually present and a short stream fails with `UnexpectedEof`.
pub fn read_exact_vec(reader: &mut impl Read, len: u64) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut out)?;
    if (out.len() as u64) < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, out.len()),
        ));
    }
    Ok(out)
}

/// Runs `probe` and restores the reader's position afterwards, even when the
/// probe fails.
pub fn with_restored_position<R, T, E>(
    reader: &mut R,
    probe: impl FnOnce(&mut R) -> std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    R: Seek,
    E: From<io::Error>,
{
    let start = reader.stream_position()?;
    let result = probe(reader);
    reader.seek(SeekFrom::Start(start))?;
    result
}

/// Strips leading and trailing ASCII whitespace and NUL padding.
pub fn trim_field(bytes: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| b.is_ascii_whitespace() || *b == 0;
    let start = bytes.iter().position(|b| !is_pad(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_pad(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Trimmed field bytes as ASCII text, or `None` if they are not valid UTF-8.
pub fn trimmed_ascii(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(trim_field(bytes)).ok()
}

/// Opens a file, reporting a missing path as [`DbfError::NotFound`] rather
/// than a generic I/O error.
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DbfError::NotFound(path.to_path_buf()),
        _ => DbfError::Io(e),
    })
}

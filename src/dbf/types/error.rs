//! Custom error types for the dbf-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DbfError {
    /// An error originating from I/O operations after a successful open.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The requested table or memo file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Fewer bytes were available than the version's fixed header requires.
    #[error("Truncated header: expected {expected} bytes, but found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    /// The file is structurally invalid or uses a layout this reader cannot decode.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The column lengths do not add up to the record length declared in the header.
    #[error("Record length mismatch: header declares {declared} bytes, columns need {computed}")]
    RecordLengthMismatch { declared: u16, computed: u32 },

    /// A column descriptor has a zero length or an empty name once cleaned.
    #[error("Invalid column #{index}: {reason}")]
    InvalidColumn { index: usize, reason: String },

    /// A record was requested from a table that declares no columns.
    #[error("Table has no columns defined")]
    NoColumns,

    /// The requested record index lies beyond the header's record count.
    #[error("Record index {index} is out of range (table has {count} records)")]
    RecordOutOfRange { index: u32, count: u32 },

    /// The caller asked for a text encoding that is not recognised.
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// The table was closed and its handles released.
    #[error("Table is closed")]
    Closed,

    /// A mutex lock was poisoned, indicating a panic in another thread holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

impl DbfError {
    /// Returns `true` when the error means a table or memo file is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbfError::NotFound(_))
    }

    /// Returns `true` for errors that describe a corrupt or unsupported file layout.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DbfError::TruncatedHeader { .. }
                | DbfError::InvalidFormat(_)
                | DbfError::RecordLengthMismatch { .. }
                | DbfError::InvalidColumn { .. }
        )
    }
}

/// A convenience `Result` type alias using the crate's `DbfError` type.
pub type Result<T> = std::result::Result<T, DbfError>;

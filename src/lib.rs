//! # dbf-reader
//!
//! A reader for dBase-family tables (.dbf), including FoxBase, dBase III/IV/7,
//! FoxPro and Visual FoxPro variants, with `.dbt` and `.fpt` memo support.
//!
//! Writing tables and index files (.idx/.cdx) are not supported.
pub mod dbf;

// Re-export the main types for convenience
pub use dbf::{
    Column, ColumnType, DbfError, Header, MemoKind, MemoStore, Record, RecordIterator, Result,
    Table, TextEncoding, Value, Version,
};

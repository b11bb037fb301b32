//! Core dBase table reader module

pub mod codec;
pub mod format;
pub mod iter;
pub mod memo;
pub mod reader;
pub mod types;
mod utils;

pub use codec::text::TextEncoding;
pub use iter::RecordIterator;
pub use memo::{MemoKind, MemoStore};
pub use reader::{DataSource, Table};
pub use types::error::{DbfError, Result};
pub use types::models::{Column, ColumnType, Header, Version};
pub use types::record::Record;
pub use types::value::Value;

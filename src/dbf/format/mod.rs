//! File format parsing layer for dBase tables.
//!
//! # Module Organization
//!
//! - [`header`]: Parses the fixed-size table header
//! - [`columns`]: Parses the version-dependent column descriptor table
//! - [`record`]: Decodes one fixed-length record into typed values
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────────┐
//! │  Header             │ ← header::parse()
//! ├─────────────────────┤
//! │  Column descriptors │ ← columns::parse()
//! │  ... 0x0D           │
//! ├─────────────────────┤
//! │  Records            │ ← record::decode()
//! │  (flag + fields)    │
//! └─────────────────────┘
//! ```

pub mod columns;
pub mod header;
pub mod record;

//! Core data structures for dBase table components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Version codes and their layout properties
//! - The parsed table header
//! - Column definitions and type codes

use std::fmt;

/// FoxBase tables have an 8-byte header; descriptors follow immediately.
pub const DBASE2_HEADER_SIZE: u64 = 8;
/// The common 32-byte header shared by dBase III onwards.
pub const DBF_HEADER_SIZE: usize = 32;
/// dBase 7 appends a 32-byte language driver name and 4 reserved bytes.
pub const DBASE7_HEADER_SIZE: u64 = 68;
/// FoxBase headers never declare their length; the layout is fixed.
pub const DBASE2_HEADER_LENGTH: u16 = 521;
/// Terminates the column descriptor table.
pub const DESCRIPTOR_TERMINATOR: u8 = 0x0D;
/// First byte of a soft-deleted record.
pub const DELETED_MARKER: u8 = b'*';

/// The one-byte version code at offset 0 of every table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(pub u8);

impl Version {
    pub const FOXBASE: Version = Version(0x02);
    pub const DBASE3_MEMO: Version = Version(0x83);

    /// Two lowercase hex digits, e.g. `"83"` or `"f5"`.
    pub fn hex(&self) -> String {
        format!("{:02x}", self.0)
    }

    /// Human-readable name of the dialect, if the code is known.
    pub fn description(&self) -> Option<&'static str> {
        let name = match self.0 {
            0x02 => "FoxBase",
            0x03 => "dBase III without memo file",
            0x04 => "dBase IV without memo file",
            0x05 => "dBase V without memo file",
            0x07 => "Visual Objects 1.x",
            0x30 => "Visual FoxPro",
            0x31 => "Visual FoxPro with AutoIncrement field",
            0x32 => "Visual FoxPro with field type Varchar or Varbinary",
            0x43 => "dBASE IV SQL table files, no memo",
            0x63 => "dBASE IV SQL system files, no memo",
            0x7b => "dBase IV with memo file",
            0x83 => "dBase III with memo file",
            0x87 => "Visual Objects 1.x with memo file",
            0x8b => "dBase IV with memo file",
            0x8c => "dBase 7",
            0x8e => "dBase IV with SQL table",
            0xcb => "dBASE IV SQL table files, with memo",
            0xf5 => "FoxPro with memo file",
            0xfb => "FoxPro without memo file",
            _ => return None,
        };
        Some(name)
    }

    /// FoxPro and Visual FoxPro share the `.fpt` memo format and binary doubles.
    pub fn is_foxpro(&self) -> bool {
        matches!(self.0, 0x30 | 0x31 | 0x32 | 0xf5 | 0xfb)
    }

    /// Visual FoxPro stores memo block pointers as 4-byte binary integers.
    pub fn is_visual_foxpro(&self) -> bool {
        matches!(self.0, 0x30 | 0x31 | 0x32)
    }

    /// dBase 7 layouts use 48-byte descriptors with 32-byte names.
    pub fn is_dbase7(&self) -> bool {
        matches!(self.0, 0x04 | 0x8c)
    }

    /// Offset of the first column descriptor.
    pub fn descriptor_start(&self) -> u64 {
        if *self == Version::FOXBASE {
            DBASE2_HEADER_SIZE
        } else if self.is_dbase7() {
            DBASE7_HEADER_SIZE
        } else {
            DBF_HEADER_SIZE as u64
        }
    }

    /// Shape of one column descriptor for this version.
    pub fn descriptor_layout(&self) -> DescriptorLayout {
        if *self == Version::FOXBASE {
            DescriptorLayout::FoxBase
        } else if self.is_dbase7() {
            DescriptorLayout::Dbase7
        } else {
            DescriptorLayout::Standard
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// The three column descriptor shapes found in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorLayout {
    /// 16 bytes: name(11) type(1) length(1), decimal fixed at 0.
    FoxBase,
    /// 48 bytes: name(32) type(1) length(1) decimal(1) reserved(13).
    Dbase7,
    /// 32 bytes: name(11) type(1) reserved(4) length(1) decimal(1) reserved(14).
    Standard,
}

impl DescriptorLayout {
    pub fn size(&self) -> usize {
        match self {
            DescriptorLayout::FoxBase => (DBASE2_HEADER_SIZE * 2) as usize,
            DescriptorLayout::Dbase7 => 48,
            DescriptorLayout::Standard => 32,
        }
    }

    pub fn name_width(&self) -> usize {
        match self {
            DescriptorLayout::Dbase7 => 32,
            DescriptorLayout::FoxBase | DescriptorLayout::Standard => 11,
        }
    }
}

/// Parsed fixed-size table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    pub record_count: u32,
    pub header_length: u16,
    pub record_length: u16,
    /// Code page marker; absent for FoxBase tables.
    pub encoding_key: Option<u8>,
}

/// A dBase field type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Character,
    Number,
    Float,
    Logical,
    Date,
    DateTime,
    Memo,
    SignedLong,
    Currency,
    Double,
    General,
    Picture,
    Varchar,
    Varbinary,
    Timestamp,
    Double7,
    AutoIncrement,
    NullFlags,
    Other(u8),
}

impl ColumnType {
    pub fn code(&self) -> char {
        match self {
            ColumnType::Character => 'C',
            ColumnType::Number => 'N',
            ColumnType::Float => 'F',
            ColumnType::Logical => 'L',
            ColumnType::Date => 'D',
            ColumnType::DateTime => 'T',
            ColumnType::Memo => 'M',
            ColumnType::SignedLong => 'I',
            ColumnType::Currency => 'Y',
            ColumnType::Double => 'B',
            ColumnType::General => 'G',
            ColumnType::Picture => 'P',
            ColumnType::Varchar => 'V',
            ColumnType::Varbinary => 'X',
            ColumnType::Timestamp => '@',
            ColumnType::Double7 => 'O',
            ColumnType::AutoIncrement => '+',
            ColumnType::NullFlags => '0',
            ColumnType::Other(b) => *b as char,
        }
    }

    /// Columns whose raw bytes name a starting block in the memo store.
    pub fn is_memo(&self) -> bool {
        matches!(
            self,
            ColumnType::Memo | ColumnType::General | ColumnType::Picture
        )
    }
}

impl From<u8> for ColumnType {
    fn from(code: u8) -> Self {
        match code {
            b'C' => ColumnType::Character,
            b'N' => ColumnType::Number,
            b'F' => ColumnType::Float,
            b'L' => ColumnType::Logical,
            b'D' => ColumnType::Date,
            b'T' => ColumnType::DateTime,
            b'M' => ColumnType::Memo,
            b'I' => ColumnType::SignedLong,
            b'Y' => ColumnType::Currency,
            b'B' => ColumnType::Double,
            b'G' => ColumnType::General,
            b'P' => ColumnType::Picture,
            b'V' => ColumnType::Varchar,
            b'X' => ColumnType::Varbinary,
            b'@' => ColumnType::Timestamp,
            b'O' => ColumnType::Double7,
            b'+' => ColumnType::AutoIncrement,
            b'0' => ColumnType::NullFlags,
            other => ColumnType::Other(other),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single column definition from the descriptor table.
///
/// Parsed once when the table is opened and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub length: u16,
    pub decimal: u8,
    /// Byte offset within a physical record; offset 0 is the deletion flag.
    pub record_offset: usize,
}

impl Column {
    /// The column name in snake_case, e.g. `OrderDate` becomes `order_date`.
    pub fn underscored_name(&self) -> String {
        underscore(&self.name)
    }
}

pub(crate) fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c.to_ascii_lowercase());
        }
        prev = Some(c);
    }
    out
}

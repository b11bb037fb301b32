//! Text-encoding normalization for character and memo data.

use std::fmt;

use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};
use oem_cp::code_table_type::TableType;

use super::codepage;
use crate::dbf::types::error::{DbfError, Result};

/// The codec a table's text is stored in.
///
/// Windows, Mac and CJK code pages go through `encoding_rs`; DOS OEM pages
/// (437, 850, 852 ...) are single-byte tables from `oem_cp`.
#[derive(Clone, Copy)]
pub enum TextEncoding {
    Whatwg(&'static Encoding),
    Oem {
        name: &'static str,
        table: &'static TableType,
    },
}

impl TextEncoding {
    pub const UTF_8: TextEncoding = TextEncoding::Whatwg(UTF_8);

    /// Canonical name, e.g. `"windows-1252"` or `"cp850"`.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Whatwg(encoding) => encoding.name(),
            TextEncoding::Oem { name, .. } => *name,
        }
    }
}

impl PartialEq for TextEncoding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TextEncoding::Whatwg(a), TextEncoding::Whatwg(b)) => a == b,
            (TextEncoding::Oem { name: a, .. }, TextEncoding::Oem { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for TextEncoding {}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

impl From<&'static Encoding> for TextEncoding {
    fn from(encoding: &'static Encoding) -> Self {
        TextEncoding::Whatwg(encoding)
    }
}

/// Decodes bytes under `encoding` into UTF-8.
///
/// Undecodable sequences become U+FFFD; this never fails.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Whatwg(encoding) => {
            let (text, _) = encoding.decode_without_bom_handling(bytes);
            text.into_owned()
        }
        TextEncoding::Oem { table, .. } => table.decode_string_lossy(bytes),
    }
}

/// Parses a caller-supplied encoding label.
///
/// Accepts WHATWG labels (`"windows-1252"`, `"gbk"`) as well as the code page
/// names used by the header marker table (`"cp1251"`, `"cp850"`).
pub fn parse_encoding(label: &str) -> Result<TextEncoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes())
        .map(TextEncoding::Whatwg)
        .or_else(|| codepage::encoding_for_code_page(label))
        .ok_or_else(|| DbfError::UnknownEncoding(label.to_string()))
}

/// Picks the table's text encoding.
///
/// Priority (highest first):
/// 1. `user_encoding`, an explicit caller override
/// 2. the code page marker in the header, if it is a known code page
/// 3. UTF-8
pub fn resolve(user_encoding: Option<TextEncoding>, marker: Option<u8>) -> TextEncoding {
    let from_header = marker.filter(|&m| m != 0).and_then(|m| {
        let encoding = codepage::encoding_for_marker(m);
        if encoding.is_none() {
            match codepage::code_page_name(m) {
                Some(name) => warn!(
                    "Code page {} (marker {:#04x}) has no codec; falling back",
                    name, m
                ),
                None => warn!("Unknown code page marker {:#04x}; falling back", m),
            }
        }
        encoding
    });

    match (user_encoding, from_header) {
        (Some(user), Some(header)) if user != header => {
            info!(
                "Text encoding overridden: header='{}', final='{}'",
                header.name(),
                user.name()
            );
            user
        }
        (Some(user), _) => user,
        (None, Some(header)) => header,
        (None, None) => TextEncoding::UTF_8,
    }
}

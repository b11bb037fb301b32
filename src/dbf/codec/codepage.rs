//! Code page markers stored at byte 29 of the table header.

use encoding_rs::Encoding;
use oem_cp::code_table::DECODING_TABLE_CP_MAP;

use super::text::TextEncoding;

/// Marker byte to code page name.
pub static CODE_PAGES: &[(u8, &str)] = &[
    (0x01, "cp437"),  // U.S. MS-DOS
    (0x02, "cp850"),  // International MS-DOS
    (0x03, "cp1252"), // Windows ANSI
    (0x08, "cp865"),  // Danish OEM
    (0x09, "cp437"),  // Dutch OEM
    (0x0a, "cp850"),  // Dutch OEM*
    (0x0b, "cp437"),  // Finnish OEM
    (0x0d, "cp437"),  // French OEM
    (0x0e, "cp850"),  // French OEM*
    (0x0f, "cp437"),  // German OEM
    (0x10, "cp850"),  // German OEM*
    (0x11, "cp437"),  // Italian OEM
    (0x12, "cp850"),  // Italian OEM*
    (0x13, "cp932"),  // Japanese Shift-JIS
    (0x14, "cp850"),  // Spanish OEM*
    (0x15, "cp437"),  // Swedish OEM
    (0x16, "cp850"),  // Swedish OEM*
    (0x17, "cp865"),  // Norwegian OEM
    (0x18, "cp437"),  // Spanish OEM
    (0x19, "cp437"),  // English OEM (Britain)
    (0x1a, "cp850"),  // English OEM (Britain)*
    (0x1b, "cp437"),  // English OEM (U.S.)
    (0x1c, "cp863"),  // French OEM (Canada)
    (0x1d, "cp850"),  // French OEM*
    (0x1f, "cp852"),  // Czech OEM
    (0x22, "cp852"),  // Hungarian OEM
    (0x23, "cp852"),  // Polish OEM
    (0x24, "cp860"),  // Portuguese OEM
    (0x25, "cp850"),  // Portuguese OEM*
    (0x26, "cp866"),  // Russian OEM
    (0x37, "cp850"),  // English OEM (U.S.)*
    (0x40, "cp852"),  // Romanian OEM
    (0x4d, "cp936"),  // Chinese GBK (PRC)
    (0x4e, "cp949"),  // Korean (ANSI/OEM)
    (0x4f, "cp950"),  // Chinese Big5 (Taiwan)
    (0x50, "cp874"),  // Thai (ANSI/OEM)
    (0x57, "cp1252"), // ANSI
    (0x58, "cp1252"), // Western European ANSI
    (0x59, "cp1252"), // Spanish ANSI
    (0x64, "cp852"),  // Eastern European MS-DOS
    (0x65, "cp866"),  // Russian MS-DOS
    (0x66, "cp865"),  // Nordic MS-DOS
    (0x67, "cp861"),  // Icelandic MS-DOS
    (0x6a, "cp737"),  // Greek MS-DOS (437G)
    (0x6b, "cp857"),  // Turkish MS-DOS
    (0x6c, "cp863"),  // French-Canadian MS-DOS
    (0x78, "cp950"),  // Taiwan Big 5
    (0x79, "cp949"),  // Hangul (Wansung)
    (0x7a, "cp936"),  // PRC GBK
    (0x7b, "cp932"),  // Japanese Shift-JIS
    (0x7c, "cp874"),  // Thai Windows/MS-DOS
    (0x86, "cp737"),  // Greek OEM
    (0x87, "cp852"),  // Slovenian OEM
    (0x88, "cp857"),  // Turkish OEM
    (0x96, "x-mac-cyrillic"), // Russian Macintosh
    (0xc8, "cp1250"), // Eastern European Windows
    (0xc9, "cp1251"), // Russian Windows
    (0xca, "cp1254"), // Turkish Windows
    (0xcb, "cp1253"), // Greek Windows
    (0xcc, "cp1257"), // Baltic Windows
];

/// Looks up the code page name for a header marker.
pub fn code_page_name(marker: u8) -> Option<&'static str> {
    CODE_PAGES
        .iter()
        .find(|(key, _)| *key == marker)
        .map(|(_, name)| *name)
}

/// DOS OEM pages decoded through `oem_cp` tables.
static OEM_CODE_PAGES: &[(u16, &str)] = &[
    (437, "cp437"),
    (737, "cp737"),
    (850, "cp850"),
    (852, "cp852"),
    (857, "cp857"),
    (860, "cp860"),
    (861, "cp861"),
    (863, "cp863"),
    (865, "cp865"),
];

/// Resolves a code page name to a codec.
///
/// Windows, Mac and CJK code pages map onto their WHATWG equivalents; DOS
/// OEM pages other than 866 use an `oem_cp` decoding table.
pub fn encoding_for_code_page(name: &str) -> Option<TextEncoding> {
    let name = name.to_ascii_lowercase();
    let label = match name.as_str() {
        "cp932" => "shift_jis",
        "cp936" => "gbk",
        "cp949" => "euc-kr",
        "cp950" => "big5",
        "cp874" => "windows-874",
        other => other,
    };
    Encoding::for_label(label.as_bytes())
        .map(TextEncoding::Whatwg)
        .or_else(|| oem_encoding(&name))
}

fn oem_encoding(label: &str) -> Option<TextEncoding> {
    let number: u16 = label.strip_prefix("cp")?.parse().ok()?;
    let &(code_page, name) = OEM_CODE_PAGES.iter().find(|(cp, _)| *cp == number)?;
    let table = DECODING_TABLE_CP_MAP.get(&code_page)?;
    Some(TextEncoding::Oem { name, table })
}

/// Resolves a header marker straight to a codec, if one exists.
pub fn encoding_for_marker(marker: u8) -> Option<TextEncoding> {
    code_page_name(marker).and_then(encoding_for_code_page)
}

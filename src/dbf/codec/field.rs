//! Per-type field decoders.
//!
//! Every decoder is a pure function from the raw field bytes to a [`Value`].
//! Malformed payloads degrade to [`Value::Nil`] (or `false` for logicals)
//! instead of failing, so one bad field never aborts a table scan.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::trace;
use time::{Date, Month, PrimitiveDateTime, Time};

use super::text::{self, TextEncoding};
use crate::dbf::types::models::{Column, ColumnType, Version};
use crate::dbf::types::value::Value;
use crate::dbf::utils;

/// Table-wide settings the decoders depend on.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub version: Version,
    pub encoding: TextEncoding,
}

/// Decodes a non-memo field.
///
/// Memo-referencing columns are resolved by the record decoder through the
/// memo store and then passed to [`decode_memo`].
pub fn decode(column: &Column, raw: &[u8], ctx: &DecodeContext) -> Value {
    match column.column_type {
        ColumnType::Number => number(raw, column.decimal),
        ColumnType::Float => float(raw),
        ColumnType::SignedLong => signed_long(raw),
        ColumnType::Currency => currency(raw),
        ColumnType::Double if ctx.version.is_foxpro() => double(raw),
        ColumnType::Logical => Value::Boolean(logical(raw)),
        ColumnType::Date => date(raw),
        ColumnType::DateTime => datetime(raw),
        ColumnType::AutoIncrement => auto_increment(raw),
        ColumnType::NullFlags => Value::Blob(raw.to_vec()),
        ColumnType::Memo | ColumnType::General | ColumnType::Picture => Value::Nil,
        _ => character(raw, ctx.encoding),
    }
}

/// `N`: blank is nil, no decimals is an integer, otherwise a float.
pub fn number(raw: &[u8], decimal: u8) -> Value {
    let Some(s) = utils::trimmed_ascii(raw) else {
        return Value::Nil;
    };
    if s.is_empty() {
        return Value::Nil;
    }
    if decimal == 0 {
        match s.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            // Some writers pad integer columns as "12.00".
            Err(_) => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map_or(Value::Nil, |f| Value::Integer(f.trunc() as i64)),
        }
    } else {
        s.parse::<f64>().map_or(Value::Nil, Value::Float)
    }
}

/// `F`: text float.
pub fn float(raw: &[u8]) -> Value {
    match utils::trimmed_ascii(raw) {
        Some(s) if !s.is_empty() => s.parse::<f64>().map_or(Value::Nil, Value::Float),
        _ => Value::Nil,
    }
}

/// `I`: little-endian i32, always the first four bytes.
pub fn signed_long(raw: &[u8]) -> Value {
    if raw.len() < 4 {
        return Value::Nil;
    }
    Value::Integer(LittleEndian::read_i32(&raw[..4]) as i64)
}

/// `Y`: little-endian i64 scaled by 10^4.
pub fn currency(raw: &[u8]) -> Value {
    if raw.len() < 8 {
        return Value::Nil;
    }
    Value::Float(LittleEndian::read_i64(&raw[..8]) as f64 / 10_000.0)
}

/// `B` in FoxPro tables: little-endian IEEE-754 double.
pub fn double(raw: &[u8]) -> Value {
    if raw.len() < 8 {
        return Value::Nil;
    }
    Value::Float(LittleEndian::read_f64(&raw[..8]))
}

/// `+`: big-endian i32 stored with its sign bit flipped.
pub fn auto_increment(raw: &[u8]) -> Value {
    if raw.len() < 4 {
        return Value::Nil;
    }
    let stored = BigEndian::read_u32(&raw[..4]);
    Value::Integer((stored ^ 0x8000_0000) as i32 as i64)
}

/// `L`: `y`/`t` in any case is true, anything else is false.
pub fn logical(raw: &[u8]) -> bool {
    matches!(utils::trim_field(raw), [b'y' | b'Y' | b't' | b'T'])
}

/// `D`: eight ASCII digits `YYYYMMDD`, spaces read as zeros.
pub fn date(raw: &[u8]) -> Value {
    let digits: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b' ' { b'0' } else { b })
        .collect();
    if digits.len() != 8 || !digits.iter().all(u8::is_ascii_digit) {
        return Value::Nil;
    }
    let num = |range: std::ops::Range<usize>| {
        digits[range]
            .iter()
            .fold(0u32, |acc, d| acc * 10 + (d - b'0') as u32)
    };
    let (year, month, day) = (num(0..4) as i32, num(4..6) as u8, num(6..8) as u8);

    Month::try_from(month)
        .and_then(|m| Date::from_calendar_date(year, m, day))
        .map_or_else(
            |_| {
                trace!("Invalid date {:?}", String::from_utf8_lossy(raw));
                Value::Nil
            },
            Value::Date,
        )
}

/// `T`: little-endian Julian day number and milliseconds since midnight.
pub fn datetime(raw: &[u8]) -> Value {
    if raw.len() < 8 {
        return Value::Nil;
    }
    let days = LittleEndian::read_i32(&raw[0..4]);
    let millis = LittleEndian::read_i32(&raw[4..8]);
    // Empty datetime fields are zero-filled.
    if days <= 0 || millis < 0 {
        return Value::Nil;
    }
    let secs = millis / 1000;
    let (hour, minute, second) = (secs / 3600, (secs / 60) % 60, secs % 60);
    let Ok(hour) = u8::try_from(hour) else {
        return Value::Nil;
    };

    match (
        Date::from_julian_day(days),
        Time::from_hms_milli(hour, minute as u8, second as u8, (millis % 1000) as u16),
    ) {
        (Ok(date), Ok(time)) => Value::DateTime(PrimitiveDateTime::new(date, time)),
        _ => {
            trace!("Invalid datetime: julian_day={}, millis={}", days, millis);
            Value::Nil
        }
    }
}

/// `C` and every code without a dedicated decoder.
pub fn character(raw: &[u8], encoding: TextEncoding) -> Value {
    Value::Text(text::decode(utils::trim_field(raw), encoding))
}

/// Extracts the starting memo block from a memo field.
///
/// Visual FoxPro stores a 4-byte little-endian integer; everything else
/// stores ASCII digits padded with spaces. Unreadable pointers are block 0.
pub fn memo_block(raw: &[u8], version: Version) -> u32 {
    if version.is_visual_foxpro() && raw.len() == 4 {
        return LittleEndian::read_u32(raw);
    }
    utils::trimmed_ascii(raw)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Turns resolved memo content into a value.
///
/// `M` memos are text; `G` and `P` memos are binary objects.
pub fn decode_memo(column: &Column, content: Option<Vec<u8>>, encoding: TextEncoding) -> Value {
    match (content, column.column_type) {
        (None, _) => Value::Nil,
        (Some(bytes), ColumnType::Memo) => Value::Text(text::decode(&bytes, encoding)),
        (Some(bytes), _) => Value::Blob(bytes),
    }
}

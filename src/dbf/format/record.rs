//! Decoding of one physical record into a [`Record`].

use log::trace;

use crate::dbf::codec::field::{self, DecodeContext};
use crate::dbf::memo::MemoStore;
use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::Column;
use crate::dbf::types::record::Record;

/// Decodes the bytes that follow a record's deletion flag.
///
/// `body` is `record_length - 1` bytes long. Each column is sliced at its
/// precomputed offset; memo columns consult `memo` when one is open and
/// decode to nil otherwise.
pub fn decode(
    body: &[u8],
    columns: &[Column],
    mut memo: Option<&mut MemoStore>,
    ctx: &DecodeContext,
) -> Result<Record> {
    let mut fields = Vec::with_capacity(columns.len());

    for column in columns {
        let start = column.record_offset - 1;
        let end = start + column.length as usize;
        let raw = body.get(start..end).ok_or_else(|| {
            DbfError::InvalidFormat(format!(
                "Column {} [{}..{}] is out of bounds for a record body of {} bytes",
                column.name,
                start,
                end,
                body.len()
            ))
        })?;

        let value = if column.column_type.is_memo() {
            let block = field::memo_block(raw, ctx.version);
            let content = match memo.as_deref_mut() {
                Some(store) => store.get(block)?,
                None => None,
            };
            trace!("Memo column {} -> block {}", column.name, block);
            field::decode_memo(column, content, ctx.encoding)
        } else {
            field::decode(column, raw, ctx)
        };
        fields.push((column.name.clone(), value));
    }

    Ok(Record::new(fields))
}

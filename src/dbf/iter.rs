//! Sequential access to table records.
//!
//! # Example
//! ```no_run
//! # use dbf_reader::Table;
//! # let table = Table::new("people.dbf", None, None).unwrap();
//! for result in table.iter() {
//!     match result.unwrap() {
//!         Some(record) => println!("{:?}", record.get("NAME")),
//!         None => continue, // deleted
//!     }
//! }
//! ```

use super::reader::Table;
use super::types::error::Result;
use super::types::record::Record;

/// Iterator over every record slot of a [`Table`], in file order.
///
/// Yields `Ok(None)` for deleted records so positions stay aligned with
/// record indices.
///
/// Created by [`Table::iter()`](crate::Table::iter).
pub struct RecordIterator<'a> {
    table: &'a Table,
    index: u32,
}

impl<'a> RecordIterator<'a> {
    pub(super) fn new(table: &'a Table) -> Self {
        Self { table, index: 0 }
    }
}

impl<'a> Iterator for RecordIterator<'a> {
    type Item = Result<Option<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.table.record_count() {
            return None;
        }
        let result = self.table.record(self.index);
        self.index += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.record_count().saturating_sub(self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}

impl<'a> IntoIterator for &'a Table {
    type Item = Result<Option<Record>>;
    type IntoIter = RecordIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

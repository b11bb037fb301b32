//! The decoded record: an ordered mapping from column name to value.

use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::models::underscore;
use super::value::Value;

/// One non-deleted row of a table.
///
/// Fields keep the column order of the descriptor table. Lookup by name
/// tries the exact name first, then a case-insensitive match, then the
/// snake_case form produced by
/// [`Column::underscored_name`](super::models::Column::underscored_name).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub(crate) fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// Looks up a field by its position in the column sequence.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.fields.into_iter().map(|(_, v)| v).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(n, _)| n == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|(n, _)| n.eq_ignore_ascii_case(name))
            })
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|(n, _)| underscore(n) == name)
            })
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// # Panics
    /// Panics if no column matches `name`.
    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no column named {:?} in record", name),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

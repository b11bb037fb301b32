//! Builders for synthetic tables and memo files.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub struct TableBuilder {
    version: u8,
    code_page: u8,
    columns: Vec<(String, u8, u8, u8)>,
    records: Vec<Vec<u8>>,
    record_length_override: Option<u16>,
}

impl TableBuilder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            code_page: 0,
            columns: Vec::new(),
            records: Vec::new(),
            record_length_override: None,
        }
    }

    pub fn code_page(mut self, marker: u8) -> Self {
        self.code_page = marker;
        self
    }

    pub fn column(mut self, name: &str, code: char, length: u8, decimal: u8) -> Self {
        self.columns.push((name.to_string(), code as u8, length, decimal));
        self
    }

    pub fn record_length(mut self, length: u16) -> Self {
        self.record_length_override = Some(length);
        self
    }

    /// Adds a live record from text fields, padded to each column's width.
    pub fn record(self, fields: &[&str]) -> Self {
        let raw = self.pad_fields(fields);
        self.raw_record(false, raw)
    }

    /// Adds a soft-deleted record.
    pub fn deleted(self, fields: &[&str]) -> Self {
        let raw = self.pad_fields(fields);
        self.raw_record(true, raw)
    }

    /// Adds a record from exact field bytes.
    pub fn raw_record(mut self, deleted: bool, fields: Vec<Vec<u8>>) -> Self {
        let mut bytes = vec![if deleted { b'*' } else { b' ' }];
        for (field, (_, _, length, _)) in fields.into_iter().zip(&self.columns) {
            assert_eq!(field.len(), *length as usize, "field width mismatch");
            bytes.extend(field);
        }
        self.records.push(bytes);
        self
    }

    fn pad_fields(&self, fields: &[&str]) -> Vec<Vec<u8>> {
        fields
            .iter()
            .zip(&self.columns)
            .map(|(value, (_, code, length, _))| {
                let width = *length as usize;
                let mut field = value.as_bytes().to_vec();
                field.truncate(width);
                let pad = vec![b' '; width - field.len()];
                if matches!(code, b'N' | b'F' | b'M' | b'G') {
                    [pad, field].concat()
                } else {
                    [field, pad].concat()
                }
            })
            .collect()
    }

    fn computed_record_length(&self) -> u16 {
        1 + self.columns.iter().map(|c| c.2 as u16).sum::<u16>()
    }

    pub fn build(&self) -> Vec<u8> {
        let record_length = self
            .record_length_override
            .unwrap_or_else(|| self.computed_record_length());
        let mut out = match self.version {
            0x02 => self.foxbase_header(record_length),
            0x04 | 0x8c => self.descriptors(68, 48, 32, record_length),
            _ => self.descriptors(32, 32, 11, record_length),
        };
        for record in &self.records {
            out.extend(record);
        }
        out.push(0x1A);
        out
    }

    fn descriptors(
        &self,
        start: usize,
        size: usize,
        name_width: usize,
        record_length: u16,
    ) -> Vec<u8> {
        let header_length = (start + size * self.columns.len() + 1) as u16;
        let mut out = vec![0u8; start];
        out[0] = self.version;
        out[1..4].copy_from_slice(&[124, 6, 30]);
        out[4..8].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        out[8..10].copy_from_slice(&header_length.to_le_bytes());
        out[10..12].copy_from_slice(&record_length.to_le_bytes());
        out[29] = self.code_page;

        for (name, code, length, decimal) in &self.columns {
            let mut d = vec![0u8; size];
            d[..name.len()].copy_from_slice(name.as_bytes());
            d[name_width] = *code;
            if size == 48 {
                d[33] = *length;
                d[34] = *decimal;
            } else {
                d[16] = *length;
                d[17] = *decimal;
            }
            out.extend(d);
        }
        out.push(0x0D);
        assert_eq!(out.len(), header_length as usize);
        out
    }

    fn foxbase_header(&self, record_length: u16) -> Vec<u8> {
        let mut out = vec![0u8; 8];
        out[0] = 0x02;
        out[1..3].copy_from_slice(&(self.records.len() as u16).to_le_bytes());
        out[3..6].copy_from_slice(&[6, 30, 84]);
        out[6..8].copy_from_slice(&record_length.to_le_bytes());
        for (name, code, length, _) in &self.columns {
            let mut d = vec![0u8; 16];
            d[..name.len()].copy_from_slice(name.as_bytes());
            d[11] = *code;
            d[12] = *length;
            out.extend(d);
        }
        out.push(0x0D);
        out.resize(521, 0);
        out
    }
}

/// dBase III memo file; returns the bytes and each memo's starting block.
pub fn dbase3_memo(memos: &[&[u8]]) -> (Vec<u8>, Vec<u32>) {
    let mut out = vec![0u8; 512];
    let mut blocks = Vec::new();
    for memo in memos {
        blocks.push((out.len() / 512) as u32);
        out.extend_from_slice(memo);
        out.extend([0x1A, 0x1A]);
        out.resize(out.len().div_ceil(512) * 512, 0);
    }
    let next_free = (out.len() / 512) as u32;
    out[0..4].copy_from_slice(&next_free.to_le_bytes());
    (out, blocks)
}

/// dBase IV memo file with 8-byte block headers.
pub fn dbase4_memo(memos: &[&[u8]]) -> (Vec<u8>, Vec<u32>) {
    let mut out = vec![0u8; 512];
    let mut blocks = Vec::new();
    for memo in memos {
        blocks.push((out.len() / 512) as u32);
        out.extend([0xFF, 0xFF, 0x08, 0x00]);
        out.extend((memo.len() as u32).to_le_bytes());
        out.extend_from_slice(memo);
        out.resize(out.len().div_ceil(512) * 512, 0);
    }
    (out, blocks)
}

/// FoxPro memo file with the given block size.
pub fn foxpro_memo(block_size: u16, memos: &[&[u8]]) -> (Vec<u8>, Vec<u32>) {
    let size = block_size as usize;
    let mut out = vec![0u8; 512];
    out[6..8].copy_from_slice(&block_size.to_be_bytes());
    out.resize(out.len().div_ceil(size) * size, 0);
    let mut blocks = Vec::new();
    for memo in memos {
        blocks.push((out.len() / size) as u32);
        out.extend(1u32.to_be_bytes());
        out.extend((memo.len() as u32).to_be_bytes());
        out.extend_from_slice(memo);
        out.resize(out.len().div_ceil(size) * size, 0);
    }
    let next_free = (out.len() / size) as u32;
    out[0..4].copy_from_slice(&next_free.to_be_bytes());
    (out, blocks)
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap_or_else(|e| panic!("write {}: {}", path.display(), e));
    path
}

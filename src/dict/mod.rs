//! Fixed-width key to cell mapping
//!
//! A [`Dictionary`] lives in memory as an ordered map and is serialized on
//! demand into the binary trie layout in [`trie`]. Because the trie shape
//! depends only on the set of keys, the same entries always produce the same
//! root cell, whatever order they were inserted in.

pub mod label;
pub mod trie;

use crate::cell::bits::{BitReader, BitWriter};
use crate::cell::Cell;
use crate::errors::{CodecError, CodecResult};
use num_bigint::BigUint;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A type usable as a dictionary key of a declared bit width
///
/// Ordering must agree with the big-endian bit order of the encoded key, so
/// that iteration order matches trie order.
pub trait DictionaryKey: Ord + Clone {
    /// Encode as exactly `key_bits` bits, failing with [`CodecError::Range`]
    /// when the key does not fit
    fn to_key_bits(&self, key_bits: usize) -> CodecResult<Vec<bool>>;

    fn from_key_bits(bits: &[bool]) -> CodecResult<Self>;
}

/// Raw byte-string keys; the byte length must match the key width exactly
impl DictionaryKey for Vec<u8> {
    fn to_key_bits(&self, key_bits: usize) -> CodecResult<Vec<bool>> {
        if self.len() * 8 != key_bits {
            return Err(CodecError::Range {
                value: format!("0x{} ({} bytes)", hex::encode(self), self.len()),
                bits: key_bits,
            });
        }
        let mut reader = BitReader::new(self, key_bits);
        reader.read_bits(key_bits)
    }

    fn from_key_bits(bits: &[bool]) -> CodecResult<Self> {
        let mut writer = BitWriter::new();
        writer.write_bits(bits);
        Ok(writer.into_parts().0)
    }
}

impl DictionaryKey for BigUint {
    fn to_key_bits(&self, key_bits: usize) -> CodecResult<Vec<bool>> {
        let mut writer = BitWriter::new();
        writer.write_biguint(self, key_bits)?;
        let (data, len) = writer.into_parts();
        BitReader::new(&data, len).read_bits(len)
    }

    fn from_key_bits(bits: &[bool]) -> CodecResult<Self> {
        let mut writer = BitWriter::new();
        writer.write_bits(bits);
        let (data, len) = writer.into_parts();
        BitReader::new(&data, len).read_biguint(len)
    }
}

impl DictionaryKey for u64 {
    fn to_key_bits(&self, key_bits: usize) -> CodecResult<Vec<bool>> {
        let mut writer = BitWriter::new();
        writer.write_uint(*self, key_bits)?;
        let (data, len) = writer.into_parts();
        BitReader::new(&data, len).read_bits(len)
    }

    fn from_key_bits(bits: &[bool]) -> CodecResult<Self> {
        let mut writer = BitWriter::new();
        writer.write_bits(bits);
        let (data, len) = writer.into_parts();
        BitReader::new(&data, len).read_uint(len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<K: DictionaryKey> {
    key_bits: usize,
    entries: BTreeMap<K, Cell>,
}

impl<K: DictionaryKey> Dictionary<K> {
    pub fn new(key_bits: usize) -> Self {
        Self {
            key_bits,
            entries: BTreeMap::new(),
        }
    }

    pub fn key_bits(&self) -> usize {
        self.key_bits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite, returning the previous value under `key`
    pub fn set(&mut self, key: K, value: Cell) -> CodecResult<Option<Cell>> {
        key.to_key_bits(self.key_bits)?;
        Ok(self.entries.insert(key, value))
    }

    pub fn get(&self, key: &K) -> Option<&Cell> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<Cell> {
        self.entries.remove(key)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> btree_map::Iter<'_, K, Cell> {
        self.entries.iter()
    }

    /// Serialize to a trie root cell; `None` for an empty dictionary
    pub fn build(&self) -> CodecResult<Option<Cell>> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let entries = self
            .entries
            .iter()
            .map(|(key, value)| Ok((key.to_key_bits(self.key_bits)?, Arc::new(value.clone()))))
            .collect::<CodecResult<Vec<_>>>()?;
        debug!(
            "Building dictionary: {} entries, {}-bit keys",
            entries.len(),
            self.key_bits
        );
        trie::serialize(&entries, self.key_bits).map(Some)
    }

    /// Parse a trie root cell whose keys are `key_bits` wide
    pub fn parse(root: &Cell, key_bits: usize) -> CodecResult<Self> {
        let mut dict = Self::new(key_bits);
        for (bits, value) in trie::parse(root, key_bits)? {
            let key = K::from_key_bits(&bits)?;
            dict.entries.insert(key, value.as_ref().clone());
        }
        debug!(
            "Parsed dictionary: {} entries, {}-bit keys",
            dict.len(),
            key_bits
        );
        Ok(dict)
    }
}

impl<'a, K: DictionaryKey> IntoIterator for &'a Dictionary<K> {
    type Item = (&'a K, &'a Cell);
    type IntoIter = btree_map::Iter<'a, K, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

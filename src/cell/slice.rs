//! Read cursor over a sealed cell
//!
//! Mirrors every `Builder::store_*` with a `load_*`. Reads are strictly
//! sequential and a read that asks for more bits or refs than remain fails
//! with [`CodecError::Underflow`] without advancing.

use super::address::Address;
use super::bits::BitReader;
use super::Cell;
use crate::dict::{Dictionary, DictionaryKey};
use crate::errors::{CellResource, CodecError, CodecResult};
use num_bigint::BigUint;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Slice<'a> {
    bits: BitReader<'a>,
    references: &'a [Arc<Cell>],
    ref_offset: usize,
}

impl<'a> Slice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            bits: BitReader::new(cell.data(), cell.bit_len()),
            references: cell.references(),
            ref_offset: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.bits.remaining()
    }

    pub fn remaining_refs(&self) -> usize {
        self.references.len() - self.ref_offset
    }

    /// True when both bits and refs are exhausted
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    pub fn load_bit(&mut self) -> CodecResult<bool> {
        self.bits.read_bit()
    }

    pub fn load_bits(&mut self, count: usize) -> CodecResult<Vec<bool>> {
        self.bits.read_bits(count)
    }

    pub fn load_uint(&mut self, bits: usize) -> CodecResult<u64> {
        self.bits.read_uint(bits)
    }

    pub fn load_biguint(&mut self, bits: usize) -> CodecResult<BigUint> {
        self.bits.read_biguint(bits)
    }

    pub fn load_bytes(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        self.bits.read_bytes(len)
    }

    pub fn skip_bits(&mut self, bits: usize) -> CodecResult<()> {
        self.bits.skip(bits)
    }

    /// Load `addr_none` as `None` and `addr_std` as `Some`
    ///
    /// External and variable-length addresses, and anycast, are rejected.
    pub fn load_address(&mut self) -> CodecResult<Option<Address>> {
        let mut lookahead = self.bits.clone();
        let tag = lookahead.read_uint(2)?;
        match tag {
            0b00 => {
                self.bits = lookahead;
                Ok(None)
            }
            0b10 => {
                let anycast = lookahead.read_bit()?;
                if anycast {
                    return Err(CodecError::UnsupportedAddress(
                        "anycast addresses are not supported".to_string(),
                    ));
                }
                let workchain = lookahead.read_uint(8)? as u8 as i8;
                let hash_bytes = lookahead.read_bytes(32)?;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&hash_bytes);
                self.bits = lookahead;
                Ok(Some(Address::new(workchain, hash)))
            }
            0b01 => Err(CodecError::UnsupportedAddress(
                "external addresses (addr_extern) are not supported".to_string(),
            )),
            _ => Err(CodecError::UnsupportedAddress(
                "variable-length addresses (addr_var) are not supported".to_string(),
            )),
        }
    }

    /// Load an address that must not be `addr_none`
    pub fn load_required_address(&mut self, field: &'static str) -> CodecResult<Address> {
        self.load_address()?.ok_or(CodecError::MissingAddress(field))
    }

    /// Load a 4-bit length-prefixed coin amount
    pub fn load_coins(&mut self) -> CodecResult<u128> {
        let mut lookahead = self.bits.clone();
        let len = lookahead.read_uint(4)? as usize;
        let bytes = lookahead.read_bytes(len)?;
        self.bits = lookahead;
        Ok(bytes
            .iter()
            .fold(0u128, |acc, &byte| (acc << 8) | u128::from(byte)))
    }

    pub(crate) fn load_ref_arc(&mut self) -> CodecResult<Arc<Cell>> {
        let references = self.references;
        let cell = references
            .get(self.ref_offset)
            .ok_or(CodecError::Underflow {
                resource: CellResource::Refs,
                requested: 1,
                remaining: 0,
            })?;
        self.ref_offset += 1;
        Ok(Arc::clone(cell))
    }

    /// Load the next child cell
    pub fn load_ref(&mut self) -> CodecResult<&'a Cell> {
        let references: &'a [Arc<Cell>] = self.references;
        let cell = references
            .get(self.ref_offset)
            .ok_or(CodecError::Underflow {
                resource: CellResource::Refs,
                requested: 1,
                remaining: 0,
            })?;
        self.ref_offset += 1;
        Ok(cell.as_ref())
    }

    /// Inverse of [`Builder::store_maybe_ref`](super::Builder::store_maybe_ref)
    pub fn load_maybe_ref(&mut self) -> CodecResult<Option<&'a Cell>> {
        let mut lookahead = self.bits.clone();
        if !lookahead.read_bit()? {
            self.bits = lookahead;
            return Ok(None);
        }
        let cell = self.load_ref()?;
        self.bits = lookahead;
        Ok(Some(cell))
    }

    /// Inverse of [`Builder::store_dict`](super::Builder::store_dict)
    ///
    /// An absent dictionary parses as an empty one.
    pub fn load_dict<K: DictionaryKey>(&mut self, key_bits: usize) -> CodecResult<Dictionary<K>> {
        match self.load_maybe_ref()? {
            Some(root) => Dictionary::parse(root, key_bits),
            None => Ok(Dictionary::new(key_bits)),
        }
    }
}

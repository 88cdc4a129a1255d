//! Mutable accumulator for a single cell
//!
//! Every `store_*` call checks the 1023-bit / 4-ref limits before touching
//! the buffer, so a failed append leaves the builder unchanged. Calls chain
//! through `?`:
//!
//! ```
//! use jetton_codec::cell::Builder;
//!
//! let mut builder = Builder::new();
//! builder.store_uint(21, 32)?.store_uint(1, 64)?;
//! let cell = builder.finalize();
//! assert_eq!(cell.bit_len(), 96);
//! # Ok::<(), jetton_codec::errors::CodecError>(())
//! ```

use super::address::{Address, ADDRESS_BITS};
use super::bits::BitWriter;
use super::slice::Slice;
use super::{Cell, MAX_CELL_BITS, MAX_CELL_REFS};
use crate::dict::{Dictionary, DictionaryKey};
use crate::errors::{CellResource, CodecError, CodecResult};
use num_bigint::BigUint;
use std::sync::Arc;

/// Largest coin amount representable by the 4-bit length prefix (15 bytes)
pub const MAX_COINS: u128 = (1u128 << 120) - 1;

#[derive(Debug, Clone, Default)]
pub struct Builder {
    bits: BitWriter,
    references: Vec<Arc<Cell>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits_used(&self) -> usize {
        self.bits.bit_len()
    }

    pub fn refs_used(&self) -> usize {
        self.references.len()
    }

    pub fn available_bits(&self) -> usize {
        MAX_CELL_BITS - self.bits.bit_len()
    }

    pub fn available_refs(&self) -> usize {
        MAX_CELL_REFS - self.references.len()
    }

    fn ensure_bits(&self, requested: usize) -> CodecResult<()> {
        if requested > self.available_bits() {
            return Err(CodecError::CellOverflow {
                resource: CellResource::Bits,
                requested,
                available: self.available_bits(),
            });
        }
        Ok(())
    }

    fn ensure_refs(&self, requested: usize) -> CodecResult<()> {
        if requested > self.available_refs() {
            return Err(CodecError::CellOverflow {
                resource: CellResource::Refs,
                requested,
                available: self.available_refs(),
            });
        }
        Ok(())
    }

    pub fn store_bit(&mut self, bit: bool) -> CodecResult<&mut Self> {
        self.ensure_bits(1)?;
        self.bits.write_bit(bit);
        Ok(self)
    }

    pub fn store_bits(&mut self, bits: &[bool]) -> CodecResult<&mut Self> {
        self.ensure_bits(bits.len())?;
        self.bits.write_bits(bits);
        Ok(self)
    }

    /// Store an unsigned integer of exactly `bits` bits (at most 64)
    pub fn store_uint(&mut self, value: u64, bits: usize) -> CodecResult<&mut Self> {
        self.ensure_bits(bits)?;
        self.bits.write_uint(value, bits)?;
        Ok(self)
    }

    /// Store a wide unsigned integer, e.g. a 256-bit hash
    pub fn store_biguint(&mut self, value: &BigUint, bits: usize) -> CodecResult<&mut Self> {
        self.ensure_bits(bits)?;
        self.bits.write_biguint(value, bits)?;
        Ok(self)
    }

    /// Store raw bytes verbatim
    pub fn store_bytes(&mut self, bytes: &[u8]) -> CodecResult<&mut Self> {
        self.ensure_bits(bytes.len() * 8)?;
        self.bits.write_bytes(bytes);
        Ok(self)
    }

    /// Store `addr_std` for `Some`, `addr_none` for `None`
    pub fn store_address(&mut self, address: Option<&Address>) -> CodecResult<&mut Self> {
        match address {
            None => {
                self.ensure_bits(2)?;
                self.bits.write_uint(0b00, 2)?;
            }
            Some(address) => {
                self.ensure_bits(ADDRESS_BITS)?;
                self.bits.write_uint(0b10, 2)?;
                // no anycast
                self.bits.write_bit(false);
                self.bits.write_uint(u64::from(address.workchain() as u8), 8)?;
                self.bits.write_bytes(address.hash());
            }
        }
        Ok(self)
    }

    /// Store a coin amount: 4-bit byte count, then that many big-endian bytes
    ///
    /// The byte count is minimal, so zero is stored as a bare `0000` prefix.
    pub fn store_coins(&mut self, amount: u128) -> CodecResult<&mut Self> {
        if amount > MAX_COINS {
            return Err(CodecError::Range {
                value: amount.to_string(),
                bits: 120,
            });
        }
        let be = amount.to_be_bytes();
        let len = be.iter().take_while(|&&byte| byte == 0).count();
        let payload = &be[len..];
        self.ensure_bits(4 + payload.len() * 8)?;
        self.bits.write_uint(payload.len() as u64, 4)?;
        self.bits.write_bytes(payload);
        Ok(self)
    }

    /// Append a child cell
    pub fn store_ref(&mut self, cell: Cell) -> CodecResult<&mut Self> {
        self.store_ref_arc(Arc::new(cell))
    }

    pub(crate) fn store_ref_arc(&mut self, cell: Arc<Cell>) -> CodecResult<&mut Self> {
        self.ensure_refs(1)?;
        self.references.push(cell);
        Ok(self)
    }

    /// `Maybe ^Cell`: one presence bit, then the reference when present
    pub fn store_maybe_ref(&mut self, cell: Option<Cell>) -> CodecResult<&mut Self> {
        match cell {
            None => self.store_bit(false),
            Some(cell) => {
                self.ensure_bits(1)?;
                self.ensure_refs(1)?;
                self.bits.write_bit(true);
                self.references.push(Arc::new(cell));
                Ok(self)
            }
        }
    }

    /// Store a dictionary as `0` when absent or empty, else `1` plus a
    /// reference to its root
    pub fn store_dict<K: DictionaryKey>(
        &mut self,
        dict: Option<&Dictionary<K>>,
    ) -> CodecResult<&mut Self> {
        let root = match dict {
            Some(dict) => dict.build()?,
            None => None,
        };
        self.store_maybe_ref(root)
    }

    /// Copy the unread remainder of a slice (bits and refs)
    pub fn store_slice(&mut self, slice: &Slice<'_>) -> CodecResult<&mut Self> {
        let mut source = slice.clone();
        let bits = source.load_bits(source.remaining_bits())?;
        self.ensure_bits(bits.len())?;
        self.ensure_refs(source.remaining_refs())?;
        self.bits.write_bits(&bits);
        while source.remaining_refs() > 0 {
            self.references.push(source.load_ref_arc()?);
        }
        Ok(self)
    }

    /// Seal the accumulated bits and children into a cell
    ///
    /// Consumes the builder; limits were enforced on every append, so
    /// sealing cannot fail.
    pub fn finalize(self) -> Cell {
        let (data, bit_len) = self.bits.into_parts();
        Cell::from_parts(data, bit_len, self.references)
    }
}

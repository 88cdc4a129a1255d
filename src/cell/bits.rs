//! Bit-addressable cursors over byte buffers
//!
//! `BitWriter` appends MSB-first into a growing byte buffer and `BitReader`
//! consumes the same layout. Neither enforces cell capacity: that is the job
//! of [`Builder`](super::builder::Builder) and [`Slice`](super::slice::Slice).
//! Widths are always explicit at the call site.

use crate::errors::{CellResource, CodecError, CodecResult};
use num_bigint::BigUint;

/// Append-only bit buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn write_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> offset;
        }
        self.bit_len += 1;
    }

    /// Append `value` as an unsigned big-endian integer of exactly `bits` bits
    ///
    /// Fails with [`CodecError::Range`] when `bits > 64` or the value needs
    /// more than `bits` bits.
    pub fn write_uint(&mut self, value: u64, bits: usize) -> CodecResult<()> {
        if !fits_u64(value, bits) {
            return Err(CodecError::Range {
                value: value.to_string(),
                bits,
            });
        }
        for i in (0..bits).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Append an arbitrary-width unsigned integer (up to the cell limit)
    pub fn write_biguint(&mut self, value: &BigUint, bits: usize) -> CodecResult<()> {
        if value.bits() > bits as u64 {
            return Err(CodecError::Range {
                value: value.to_string(),
                bits,
            });
        }
        let byte_len = (bits + 7) / 8;
        if byte_len == 0 {
            return Ok(());
        }
        let bytes = value.to_bytes_be();
        let mut padded = vec![0u8; byte_len.saturating_sub(bytes.len())];
        padded.extend_from_slice(&bytes);
        let padded_bits = BitReader::new(&padded, byte_len * 8);
        for i in (byte_len * 8 - bits)..byte_len * 8 {
            self.write_bit(padded_bits.bit_at(i));
        }
        Ok(())
    }

    /// Append `bytes.len() * 8` bits verbatim
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
            return;
        }
        for byte in bytes {
            for i in (0..8).rev() {
                self.write_bit((byte >> i) & 1 == 1);
            }
        }
    }

    pub fn write_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    /// Consume the writer, returning the padded byte buffer and its bit length
    ///
    /// Unused trailing bits of the final byte are always zero.
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.data, self.bit_len)
    }
}

/// Sequential reader over a bit buffer
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: usize,
    offset: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_len` bits of `data`
    pub fn new(data: &'a [u8], bit_len: usize) -> Self {
        debug_assert!(bit_len <= data.len() * 8);
        Self {
            data,
            bit_len,
            offset: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.bit_len - self.offset
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.offset
    }

    fn ensure(&self, bits: usize) -> CodecResult<()> {
        if bits > self.remaining() {
            return Err(CodecError::Underflow {
                resource: CellResource::Bits,
                requested: bits,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    fn bit_at(&self, index: usize) -> bool {
        (self.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    pub fn read_bit(&mut self) -> CodecResult<bool> {
        self.ensure(1)?;
        let bit = self.bit_at(self.offset);
        self.offset += 1;
        Ok(bit)
    }

    /// Read an unsigned big-endian integer of `bits` bits (at most 64)
    pub fn read_uint(&mut self, bits: usize) -> CodecResult<u64> {
        if bits > 64 {
            return Err(CodecError::Range {
                value: format!("u64 read of {} bits", bits),
                bits: 64,
            });
        }
        self.ensure(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.bit_at(self.offset));
            self.offset += 1;
        }
        Ok(value)
    }

    pub fn read_biguint(&mut self, bits: usize) -> CodecResult<BigUint> {
        let bits = self.read_bits(bits)?;
        // left-pad to a whole number of bytes so the value stays right-aligned
        let mut packed = BitWriter::new();
        for _ in 0..(8 - bits.len() % 8) % 8 {
            packed.write_bit(false);
        }
        packed.write_bits(&bits);
        let (bytes, _) = packed.into_parts();
        Ok(BigUint::from_bytes_be(&bytes))
    }

    /// Read `len` whole bytes
    pub fn read_bytes(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        self.ensure(len * 8)?;
        if self.offset % 8 == 0 {
            let start = self.offset / 8;
            self.offset += len * 8;
            return Ok(self.data[start..start + len].to_vec());
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            // width 8 always fits a u64
            out.push(self.read_uint(8)? as u8);
        }
        Ok(out)
    }

    pub fn read_bits(&mut self, count: usize) -> CodecResult<Vec<bool>> {
        self.ensure(count)?;
        let bits = (self.offset..self.offset + count)
            .map(|i| self.bit_at(i))
            .collect();
        self.offset += count;
        Ok(bits)
    }

    pub fn skip(&mut self, bits: usize) -> CodecResult<()> {
        self.ensure(bits)?;
        self.offset += bits;
        Ok(())
    }
}

/// Number of bits needed to store any value in `0..=max`, i.e. `ceil(log2(max + 1))`
pub fn bit_length(max: usize) -> usize {
    (usize::BITS - max.leading_zeros()) as usize
}

fn fits_u64(value: u64, bits: usize) -> bool {
    match bits {
        0 => value == 0,
        1..=63 => value >> bits == 0,
        64 => true,
        _ => false,
    }
}

//! Edge labels of the dictionary trie
//!
//! A label is the run of key bits shared by every entry below an edge. Three
//! encodings exist and the writer always picks the shortest one, preferring
//! `short` on ties, then `long`, then `same`:
//!
//! | kind  | layout                                  | cost (bits)        |
//! |-------|-----------------------------------------|--------------------|
//! | short | `0` + unary(n) + bits                   | `2n + 2`           |
//! | long  | `10` + n in `bit_length(m)` + bits      | `2 + len(m) + n`   |
//! | same  | `11` + bit + n in `bit_length(m)`       | `3 + len(m)`       |
//!
//! `m` is the number of key bits still unconsumed at this edge, and
//! `bit_length(m)` is `ceil(log2(m + 1))`.

use crate::cell::bits::bit_length;
use crate::cell::{Builder, Slice};
use crate::errors::{CodecError, CodecResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Short,
    Long,
    Same(bool),
}

/// Pick the encoding with the fewest bits for `label` under `max_len`
pub fn choose(label: &[bool], max_len: usize) -> LabelKind {
    let n = label.len();
    let len_bits = bit_length(max_len);

    let mut kind = LabelKind::Short;
    let mut cost = 2 * n + 2;

    let long_cost = 2 + len_bits + n;
    if long_cost < cost {
        kind = LabelKind::Long;
        cost = long_cost;
    }

    if let Some(bit) = uniform_bit(label) {
        if 3 + len_bits < cost {
            kind = LabelKind::Same(bit);
        }
    }
    kind
}

/// The repeated bit when every bit of `label` is equal
///
/// Empty labels count as uniform (of zeros).
fn uniform_bit(label: &[bool]) -> Option<bool> {
    let first = label.first().copied().unwrap_or(false);
    label.iter().all(|&bit| bit == first).then_some(first)
}

pub fn write(builder: &mut Builder, label: &[bool], max_len: usize) -> CodecResult<()> {
    let len_bits = bit_length(max_len);
    match choose(label, max_len) {
        LabelKind::Short => {
            builder.store_bit(false)?;
            for _ in 0..label.len() {
                builder.store_bit(true)?;
            }
            builder.store_bit(false)?;
            builder.store_bits(label)?;
        }
        LabelKind::Long => {
            builder.store_uint(0b10, 2)?;
            builder.store_uint(label.len() as u64, len_bits)?;
            builder.store_bits(label)?;
        }
        LabelKind::Same(bit) => {
            builder.store_uint(0b11, 2)?;
            builder.store_bit(bit)?;
            builder.store_uint(label.len() as u64, len_bits)?;
        }
    }
    Ok(())
}

/// Read a label, failing with [`CodecError::MalformedDictionary`] when it
/// claims more bits than the key has left
pub fn read(slice: &mut Slice<'_>, max_len: usize) -> CodecResult<Vec<bool>> {
    let too_long = |n: usize| {
        CodecError::MalformedDictionary(format!(
            "label of {} bits exceeds remaining key length {}",
            n, max_len
        ))
    };

    if !slice.load_bit()? {
        let mut n = 0;
        while slice.load_bit()? {
            n += 1;
            if n > max_len {
                return Err(too_long(n));
            }
        }
        return slice.load_bits(n);
    }

    let len_bits = bit_length(max_len);
    if !slice.load_bit()? {
        let n = slice.load_uint(len_bits)? as usize;
        if n > max_len {
            return Err(too_long(n));
        }
        return slice.load_bits(n);
    }

    let bit = slice.load_bit()?;
    let n = slice.load_uint(len_bits)? as usize;
    if n > max_len {
        return Err(too_long(n));
    }
    Ok(vec![bit; n])
}

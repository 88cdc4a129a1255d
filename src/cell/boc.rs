//! Bag-of-cells (BOC) container
//!
//! The standard `b5ee9c72` serialization used to move cell trees between
//! tools and the network layer. Layout:
//!
//! ```text
//! magic:4  flags:1  off_bytes:1  cells:S  roots:S  absent:S  tot_size:O
//! root_list:S*roots  [index:O*cells]  cell_data  [crc32c:4 LE]
//! ```
//!
//! Written BOCs have no index and no cache bits, a single root, and cells in
//! parent-before-child order with identical subtrees stored once.

use super::{Cell, MAX_CELL_BITS, MAX_CELL_REFS};
use crate::errors::{CodecError, CodecResult};
use byteorder::{BigEndian, ReadBytesExt};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::sync::Arc;
use tracing::debug;

pub const BOC_MAGIC: u32 = 0xb5ee9c72;

const FLAG_HAS_INDEX: u8 = 0x80;
const FLAG_HAS_CRC32C: u8 = 0x40;
const SIZE_MASK: u8 = 0x07;

/// Serialize a single-root bag of cells
pub fn serialize(root: &Cell, with_crc: bool) -> Vec<u8> {
    let order = topological_order(root);
    let index: HashMap<[u8; 32], usize> = order
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.hash(), i))
        .collect();

    let size_bytes = byte_width(order.len() as u64);

    let mut cell_data = Vec::new();
    for cell in &order {
        cell_data.extend_from_slice(&cell.descriptors());
        cell_data.extend_from_slice(&cell.padded_data());
        for child in cell.references() {
            let child_index = index[&child.hash()];
            write_sized(&mut cell_data, child_index as u64, size_bytes);
        }
    }
    let off_bytes = byte_width(cell_data.len() as u64);

    let mut out = Vec::with_capacity(cell_data.len() + 32);
    out.extend_from_slice(&BOC_MAGIC.to_be_bytes());
    let crc_flag = if with_crc { FLAG_HAS_CRC32C } else { 0 };
    out.push(crc_flag | size_bytes as u8);
    out.push(off_bytes as u8);
    write_sized(&mut out, order.len() as u64, size_bytes);
    write_sized(&mut out, 1, size_bytes);
    write_sized(&mut out, 0, size_bytes);
    write_sized(&mut out, cell_data.len() as u64, off_bytes);
    write_sized(&mut out, 0, size_bytes);
    out.extend_from_slice(&cell_data);

    if with_crc {
        let crc = crc32c::crc32c(&out);
        out.extend_from_slice(&crc.to_le_bytes());
    }
    out
}

/// Deserialize a bag of cells, returning its first root
pub fn deserialize(bytes: &[u8]) -> CodecResult<Cell> {
    deserialize_roots(bytes)?
        .into_iter()
        .next()
        .ok_or_else(|| CodecError::InvalidBoc("no root cells".to_string()))
}

/// Deserialize a bag of cells, returning every root in declaration order
pub fn deserialize_roots(bytes: &[u8]) -> CodecResult<Vec<Cell>> {
    let truncated = |_| CodecError::InvalidBoc("unexpected end of data".to_string());
    let mut cursor = Cursor::new(bytes);

    let magic = cursor.read_u32::<BigEndian>().map_err(truncated)?;
    if magic != BOC_MAGIC {
        return Err(CodecError::InvalidBoc(format!("unknown magic 0x{:08x}", magic)));
    }

    let flags = cursor.read_u8().map_err(truncated)?;
    let has_index = flags & FLAG_HAS_INDEX != 0;
    let has_crc = flags & FLAG_HAS_CRC32C != 0;
    let size_bytes = usize::from(flags & SIZE_MASK);
    if size_bytes == 0 || size_bytes > 4 {
        return Err(CodecError::InvalidBoc(format!(
            "invalid reference size {}",
            size_bytes
        )));
    }
    let off_bytes = usize::from(cursor.read_u8().map_err(truncated)?);
    if off_bytes == 0 || off_bytes > 8 {
        return Err(CodecError::InvalidBoc(format!(
            "invalid offset size {}",
            off_bytes
        )));
    }

    if has_crc {
        verify_crc(bytes)?;
    }

    let cell_count = cursor.read_uint::<BigEndian>(size_bytes).map_err(truncated)? as usize;
    let root_count = cursor.read_uint::<BigEndian>(size_bytes).map_err(truncated)? as usize;
    let absent = cursor.read_uint::<BigEndian>(size_bytes).map_err(truncated)?;
    let _total_size = cursor.read_uint::<BigEndian>(off_bytes).map_err(truncated)?;
    if absent != 0 {
        return Err(CodecError::InvalidBoc("absent cells are not supported".to_string()));
    }
    // every cell needs at least its two descriptor bytes
    if cell_count > bytes.len() / 2 {
        return Err(CodecError::InvalidBoc(format!(
            "{} cells cannot fit in {} bytes",
            cell_count,
            bytes.len()
        )));
    }
    if root_count == 0 || root_count > cell_count {
        return Err(CodecError::InvalidBoc(format!(
            "{} roots declared for {} cells",
            root_count, cell_count
        )));
    }

    let mut roots = Vec::with_capacity(root_count);
    for _ in 0..root_count {
        let root = cursor.read_uint::<BigEndian>(size_bytes).map_err(truncated)? as usize;
        if root >= cell_count {
            return Err(CodecError::InvalidBoc(format!("root index {} out of range", root)));
        }
        roots.push(root);
    }
    if has_index {
        let index_len = cell_count * off_bytes;
        cursor.set_position(cursor.position() + index_len as u64);
    }

    debug!(
        "Parsing BOC: {} cells, {} roots, crc={}",
        cell_count, root_count, has_crc
    );

    let mut raw_cells = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        raw_cells.push(read_raw_cell(&mut cursor, i, cell_count, size_bytes)?);
    }

    // children always follow their parents, so build from the back
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for (i, raw) in raw_cells.into_iter().enumerate().rev() {
        let mut references = Vec::with_capacity(raw.references.len());
        for child in raw.references {
            let child = built[child]
                .clone()
                .ok_or_else(|| CodecError::InvalidBoc(format!("cell {} not built", child)))?;
            references.push(child);
        }
        built[i] = Some(Arc::new(Cell::from_parts(raw.data, raw.bit_len, references)));
    }

    roots
        .into_iter()
        .map(|root| {
            built[root]
                .as_ref()
                .map(|cell| cell.as_ref().clone())
                .ok_or_else(|| CodecError::InvalidBoc(format!("root {} not built", root)))
        })
        .collect()
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<usize>,
}

fn read_raw_cell(
    cursor: &mut Cursor<&[u8]>,
    position: usize,
    cell_count: usize,
    size_bytes: usize,
) -> CodecResult<RawCell> {
    let truncated = |_| CodecError::InvalidBoc(format!("cell {} is truncated", position));

    let d1 = cursor.read_u8().map_err(truncated)?;
    let d2 = cursor.read_u8().map_err(truncated)?;
    let ref_count = usize::from(d1 & 0x07);
    let exotic = d1 & 0x08 != 0;
    let level = d1 >> 5;
    if exotic || level != 0 {
        return Err(CodecError::InvalidBoc(format!(
            "cell {} is exotic or has a non-zero level",
            position
        )));
    }
    if ref_count > MAX_CELL_REFS {
        return Err(CodecError::InvalidBoc(format!(
            "cell {} declares {} references",
            position, ref_count
        )));
    }

    let data_len = (usize::from(d2) + 1) / 2;
    let mut data = vec![0u8; data_len];
    cursor.read_exact(&mut data).map_err(truncated)?;

    let bit_len = if d2 % 2 == 0 {
        data_len * 8
    } else {
        // strip the completion tag from the final byte
        let last = data.last_mut().ok_or_else(|| {
            CodecError::InvalidBoc(format!("cell {} has no completion byte", position))
        })?;
        if *last == 0 {
            return Err(CodecError::InvalidBoc(format!(
                "cell {} is missing its completion tag",
                position
            )));
        }
        let trailing = last.trailing_zeros() as usize;
        *last &= !(1u8 << trailing);
        data_len * 8 - trailing - 1
    };
    if bit_len > MAX_CELL_BITS {
        return Err(CodecError::InvalidBoc(format!(
            "cell {} holds {} bits",
            position, bit_len
        )));
    }

    let mut references = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let child = cursor.read_uint::<BigEndian>(size_bytes).map_err(truncated)? as usize;
        if child <= position || child >= cell_count {
            return Err(CodecError::InvalidBoc(format!(
                "cell {} references cell {} out of order",
                position, child
            )));
        }
        references.push(child);
    }

    Ok(RawCell {
        data,
        bit_len,
        references,
    })
}

fn verify_crc(bytes: &[u8]) -> CodecResult<()> {
    if bytes.len() < 4 {
        return Err(CodecError::InvalidBoc("unexpected end of data".to_string()));
    }
    let (body, tail) = bytes.split_at(bytes.len() - 4);
    let stored = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
    let computed = crc32c::crc32c(body);
    if stored != computed {
        return Err(CodecError::BocChecksumMismatch { stored, computed });
    }
    Ok(())
}

/// Reverse post-order DFS: every parent precedes its children, shared
/// subtrees appear once
fn topological_order(root: &Cell) -> Vec<&Cell> {
    fn visit<'a>(cell: &'a Cell, seen: &mut HashSet<[u8; 32]>, post: &mut Vec<&'a Cell>) {
        if !seen.insert(cell.hash()) {
            return;
        }
        for child in cell.references() {
            visit(child.as_ref(), seen, post);
        }
        post.push(cell);
    }

    let mut seen = HashSet::new();
    let mut post = Vec::new();
    visit(root, &mut seen, &mut post);
    post.reverse();
    post
}

fn byte_width(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    ((bits + 7) / 8).max(1)
}

fn write_sized(out: &mut Vec<u8>, value: u64, width: usize) {
    out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
}

/// Serde adapter carrying a [`Cell`] as a base64 BOC string
pub mod serde_base64 {
    use super::{deserialize as from_boc, serialize as to_boc};
    use crate::cell::Cell;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cell: &Cell, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(to_boc(cell, false)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cell, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(serde::de::Error::custom)?;
        from_boc(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional cells; `null` means absent
pub mod serde_base64_option {
    use crate::cell::Cell;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "super::serde_base64")] Cell);

    pub fn serialize<S: Serializer>(cell: &Option<Cell>, serializer: S) -> Result<S::Ok, S::Error> {
        cell.clone().map(Wrapped).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Cell>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(cell)| cell))
    }
}

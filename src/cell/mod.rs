//! Cell model
//!
//! A cell is an immutable tree node: up to 1023 bits of payload plus up to
//! four ordered child cells. Every serialized value in this crate (token
//! metadata, contract data, message bodies) is a cell tree.
//!
//! Cells are built through [`Builder`] and read through [`Slice`]. Children
//! are held behind `Arc`, so cloning a cell or sharing it across threads never
//! copies the subtree and never needs a lock.

pub mod address;
pub mod bits;
pub mod boc;
pub mod builder;
pub mod slice;

pub use address::Address;
pub use builder::Builder;
pub use slice::Slice;

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Maximum payload bits in a single cell
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum child references in a single cell
pub const MAX_CELL_REFS: usize = 4;

/// Immutable cell
///
/// Depth and representation hash are computed once when the cell is sealed.
/// Equality and hashing go through the representation hash, so comparing
/// two trees never walks them.
#[derive(Clone)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
    depth: u16,
    hash: [u8; 32],
}

impl Cell {
    /// Assemble a sealed cell. Only [`Builder`] and the BOC reader create
    /// cells, and both uphold the size limits before calling this.
    pub(crate) fn from_parts(data: Vec<u8>, bit_len: usize, references: Vec<Arc<Cell>>) -> Self {
        debug_assert!(bit_len <= MAX_CELL_BITS);
        debug_assert!(references.len() <= MAX_CELL_REFS);
        debug_assert_eq!(data.len(), (bit_len + 7) / 8);
        let depth = references
            .iter()
            .map(|child| child.depth.saturating_add(1))
            .max()
            .unwrap_or(0);
        let mut cell = Self {
            data,
            bit_len,
            references,
            depth,
            hash: [0; 32],
        };
        cell.hash = cell.representation_hash();
        cell
    }

    /// The cell with no bits and no children
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), 0, Vec::new())
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Payload bytes; unused bits of the last byte are zero
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    pub fn reference(&self, index: usize) -> Option<&Cell> {
        self.references.get(index).map(|cell| cell.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0 && self.references.is_empty()
    }

    /// Start reading this cell from the beginning
    pub fn parse(&self) -> Slice<'_> {
        Slice::new(self)
    }

    /// Longest path from this cell to a leaf
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Descriptor bytes `d1` and `d2` for an ordinary level-0 cell
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.references.len() as u8;
        let d2 = (self.bit_len / 8 + (self.bit_len + 7) / 8) as u8;
        [d1, d2]
    }

    /// Payload bytes with the completion tag appended when the length is not
    /// a whole number of bytes
    pub(crate) fn padded_data(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let used = self.bit_len % 8;
        if used != 0 {
            if let Some(last) = data.last_mut() {
                *last |= 0x80 >> used;
            }
        }
        data
    }

    /// Representation hash of an ordinary cell
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    fn representation_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        for child in &self.references {
            hasher.update(child.depth.to_be_bytes());
        }
        for child in &self.references {
            hasher.update(child.hash);
        }
        hasher.finalize().into()
    }

    /// Payload rendered as hex, with `_` marking a completion-tagged final nibble
    pub fn data_hex(&self) -> String {
        if self.bit_len % 4 == 0 {
            let full = hex::encode_upper(&self.data);
            return full[..self.bit_len / 4].to_string();
        }
        let padded = hex::encode_upper(self.padded_data());
        let nibbles = (self.bit_len + 3) / 4;
        format!("{}_", &padded[..nibbles])
    }

    // a subtree already printed is shown once more as a single line
    fn fmt_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        indent: usize,
        printed: &mut HashSet<[u8; 32]>,
    ) -> fmt::Result {
        let pad = " ".repeat(indent);
        if !self.references.is_empty() && !printed.insert(self.hash) {
            return writeln!(
                f,
                "{}x{{{}}} (shared {})",
                pad,
                self.data_hex(),
                hex::encode(&self.hash[..4])
            );
        }
        writeln!(f, "{}x{{{}}}", pad, self.data_hex())?;
        for child in &self.references {
            child.fmt_tree(f, indent + 1, printed)?;
        }
        Ok(())
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.hash);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("data", &self.data_hex())
            .field("bits", &self.bit_len)
            .field("refs", &self.references.len())
            .field("hash", &hex::encode(self.hash))
            .finish()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0, &mut HashSet::new())
    }
}

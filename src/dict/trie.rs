//! Binary trie layout of a dictionary root cell
//!
//! Each cell is an edge: a label (see [`super::label`]) followed by a node.
//! A leaf node holds the value as its single reference. A fork node holds two
//! references, the left edge (next key bit `0`) and the right edge (`1`),
//! each covering the remaining key length minus the label minus one branch bit.

use super::label;
use crate::cell::{Builder, Cell};
use crate::errors::{CodecError, CodecResult};
use std::sync::Arc;

/// Key bits paired with the value stored under them
pub type Entry = (Vec<bool>, Arc<Cell>);

/// Serialize entries whose keys all have exactly `key_bits` bits
///
/// Entries must be non-empty and free of duplicate keys.
pub fn serialize(entries: &[Entry], key_bits: usize) -> CodecResult<Cell> {
    let refs: Vec<(&[bool], &Arc<Cell>)> = entries
        .iter()
        .map(|(key, value)| (key.as_slice(), value))
        .collect();
    write_edge(&refs, key_bits)
}

fn write_edge(entries: &[(&[bool], &Arc<Cell>)], remaining: usize) -> CodecResult<Cell> {
    let prefix_len = common_prefix_len(entries);
    let (first_key, first_value) = entries.first().copied().ok_or_else(|| {
        CodecError::MalformedDictionary("cannot serialize an empty edge".to_string())
    })?;

    let mut builder = Builder::new();
    label::write(&mut builder, &first_key[..prefix_len], remaining)?;

    if prefix_len == remaining {
        if entries.len() > 1 {
            return Err(CodecError::MalformedDictionary(
                "duplicate key in dictionary".to_string(),
            ));
        }
        builder.store_ref_arc(Arc::clone(first_value))?;
        return Ok(builder.finalize());
    }

    let below = remaining - prefix_len - 1;
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (key, value) in entries {
        let rest = &key[prefix_len + 1..];
        if key[prefix_len] {
            right.push((rest, *value));
        } else {
            left.push((rest, *value));
        }
    }

    builder.store_ref(write_edge(&left, below)?)?;
    builder.store_ref(write_edge(&right, below)?)?;
    Ok(builder.finalize())
}

fn common_prefix_len(entries: &[(&[bool], &Arc<Cell>)]) -> usize {
    let Some((first, _)) = entries.first() else {
        return 0;
    };
    entries[1..].iter().fold(first.len(), |len, (key, _)| {
        first[..len]
            .iter()
            .zip(key.iter())
            .take_while(|(a, b)| a == b)
            .count()
    })
}

/// Walk a trie rooted at `root`, collecting every key and its value
///
/// Entries come back in ascending key order.
pub fn parse(root: &Cell, key_bits: usize) -> CodecResult<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut prefix = Vec::with_capacity(key_bits);
    read_edge(root, key_bits, &mut prefix, &mut entries).map_err(|e| match e {
        CodecError::Underflow { .. } => {
            CodecError::MalformedDictionary(format!("truncated trie: {}", e))
        }
        other => other,
    })?;
    Ok(entries)
}

fn read_edge(
    cell: &Cell,
    remaining: usize,
    prefix: &mut Vec<bool>,
    entries: &mut Vec<Entry>,
) -> CodecResult<()> {
    let mut slice = cell.parse();
    let label = label::read(&mut slice, remaining)?;
    let depth = prefix.len();
    prefix.extend_from_slice(&label);

    let rest = remaining - label.len();
    if rest == 0 {
        let value = slice.load_ref_arc()?;
        entries.push((prefix.clone(), value));
    } else {
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        for (bit, child) in [(false, left), (true, right)] {
            prefix.push(bit);
            read_edge(child, rest - 1, prefix, entries)?;
            prefix.pop();
        }
    }

    prefix.truncate(depth);
    Ok(())
}

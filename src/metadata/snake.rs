//! Snake-format byte strings
//!
//! A byte string that does not fit in the space left in a cell continues in
//! a single child reference, which may itself continue, and so on. The
//! first cell takes as many whole bytes as it has room for; every
//! continuation cell takes up to 127.

use crate::cell::{Builder, Cell, Slice, MAX_CELL_BITS};
use crate::errors::{CodecError, CodecResult};

const CHUNK_BYTES: usize = MAX_CELL_BITS / 8;

/// Append `bytes` to `builder`, spilling the remainder into a reference chain
pub fn store_snake_bytes(builder: &mut Builder, bytes: &[u8]) -> CodecResult<()> {
    let head_len = (builder.available_bits() / 8).min(bytes.len());
    let (head, tail) = bytes.split_at(head_len);

    // build the chain from its last link back towards the head
    let mut next: Option<Cell> = None;
    for chunk in tail.chunks(CHUNK_BYTES).rev() {
        let mut link = Builder::new();
        link.store_bytes(chunk)?;
        if let Some(child) = next.take() {
            link.store_ref(child)?;
        }
        next = Some(link.finalize());
    }

    builder.store_bytes(head)?;
    if let Some(child) = next {
        builder.store_ref(child)?;
    }
    Ok(())
}

/// Read the remainder of `slice` and every continuation cell as bytes
pub fn load_snake_bytes(slice: &mut Slice<'_>) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut current = slice.clone();
    loop {
        let bits = current.remaining_bits();
        if bits % 8 != 0 {
            return Err(CodecError::MalformedSnake(format!(
                "{} bits do not form whole bytes",
                bits
            )));
        }
        out.extend(current.load_bytes(bits / 8)?);
        match current.remaining_refs() {
            0 => break,
            1 => {
                let child = current.load_ref()?;
                current = child.parse();
            }
            n => {
                return Err(CodecError::MalformedSnake(format!(
                    "snake cell has {} references",
                    n
                )))
            }
        }
    }
    // only the head slice belongs to the caller
    slice.skip_bits(slice.remaining_bits())?;
    while slice.remaining_refs() > 0 {
        slice.load_ref()?;
    }
    Ok(out)
}

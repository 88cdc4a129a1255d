//! Dictionary trie layout and the `storeDict` / `loadDict` framing

use crate::common::{bits, cell_bits};
use jetton_codec::cell::{Builder, Cell};
use jetton_codec::dict::Dictionary;
use jetton_codec::errors::CodecError;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

fn value(text: &str) -> Cell {
    let mut builder = Builder::new();
    builder.store_bytes(text.as_bytes()).unwrap();
    builder.finalize()
}

#[test]
fn test_empty_dictionary_is_single_zero_bit() -> anyhow::Result<()> {
    let dict: Dictionary<BigUint> = Dictionary::new(256);
    let mut builder = Builder::new();
    builder.store_dict(Some(&dict))?;
    let cell = builder.finalize();
    assert_eq!(cell_bits(&cell), "0");
    assert!(cell.references().is_empty());

    let parsed: Dictionary<BigUint> = cell.parse().load_dict(256)?;
    assert!(parsed.is_empty());

    let mut absent = Builder::new();
    absent.store_dict::<BigUint>(None)?;
    assert_eq!(absent.finalize(), cell);
    Ok(())
}

#[test]
fn test_stored_dictionary_is_bit_and_ref() -> anyhow::Result<()> {
    let mut dict = Dictionary::new(8);
    dict.set(0x5au64, value("v"))?;
    let mut builder = Builder::new();
    builder.store_dict(Some(&dict))?;
    let cell = builder.finalize();

    assert_eq!(cell_bits(&cell), "1");
    let root = cell.reference(0).unwrap();
    assert_eq!(cell_bits(root), "10100001011010");
    assert_eq!(root.reference(0), Some(&value("v")));
    Ok(())
}

#[test]
fn test_hashed_key_trie_root() -> anyhow::Result<()> {
    let key = |name: &str| BigUint::from_bytes_be(&Sha256::digest(name.as_bytes()));
    let mut dict = Dictionary::new(256);
    dict.set(key("name"), value("Awesome Token"))?;
    dict.set(key("symbol"), value("AWS"))?;

    // 0x82.. and 0xb7.. share the leading `10` and split on the third bit
    let root = dict.build()?.unwrap();
    assert_eq!(cell_bits(&root), "011010");
    let left = root.reference(0).unwrap();
    let right = root.reference(1).unwrap();
    assert_eq!(left.reference(0), Some(&value("Awesome Token")));
    assert_eq!(right.reference(0), Some(&value("AWS")));
    Ok(())
}

#[test]
fn test_determinism_across_insertion_orders() -> anyhow::Result<()> {
    let keys: Vec<u64> = vec![0, 1, 2, 3, 0x7fff, 0x8000, 0xfffe, 0xffff, 0x1234];
    let mut roots = Vec::new();
    for rotation in 0..keys.len() {
        let mut dict = Dictionary::new(16);
        for key in keys.iter().cycle().skip(rotation).take(keys.len()) {
            dict.set(*key, value(&key.to_string()))?;
        }
        roots.push(dict.build()?.unwrap());
    }
    assert!(roots.windows(2).all(|pair| pair[0] == pair[1]));

    let parsed: Dictionary<u64> = Dictionary::parse(&roots[0], 16)?;
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(parsed.iter().map(|(key, _)| *key).collect::<Vec<_>>(), sorted);
    Ok(())
}

#[test]
fn test_parse_with_wrong_width_is_malformed() -> anyhow::Result<()> {
    let mut dict = Dictionary::new(8);
    dict.set(0xffu64, value("x"))?;
    let root = dict.build()?.unwrap();
    // read as a 16-bit trie, the label length field runs past the cell
    assert!(matches!(
        Dictionary::<u64>::parse(&root, 16),
        Err(CodecError::MalformedDictionary(_))
    ));
    Ok(())
}

#[test]
fn test_parse_truncated_label_is_malformed() {
    let mut builder = Builder::new();
    builder.store_bits(&bits("10")).unwrap();
    let root = builder.finalize();
    assert!(matches!(
        Dictionary::<u64>::parse(&root, 8),
        Err(CodecError::MalformedDictionary(_))
    ));
}

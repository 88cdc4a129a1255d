//! Token metadata content cells

use crate::common::{awesome_token, full_token};
use jetton_codec::cell::{Builder, Cell};
use jetton_codec::dict::Dictionary;
use jetton_codec::errors::CodecError;
use jetton_codec::metadata::{
    encode_pairs, KeyVariant, MetadataField, TokenMetadata, KEY_BITS, SNAKE_PREFIX,
};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

const VARIANTS: [KeyVariant; 2] = [KeyVariant::FullKey, KeyVariant::HashedKey];

fn snake_value(prefix: u8, text: &str) -> Cell {
    let mut builder = Builder::new();
    builder
        .store_uint(u64::from(prefix), 8)
        .unwrap()
        .store_bytes(text.as_bytes())
        .unwrap();
    builder.finalize()
}

fn content_with(entries: Vec<(BigUint, Cell)>) -> Cell {
    let mut dict = Dictionary::new(KEY_BITS);
    for (key, value) in entries {
        dict.set(key, value).unwrap();
    }
    let mut builder = Builder::new();
    builder
        .store_uint(0, 8)
        .unwrap()
        .store_dict(Some(&dict))
        .unwrap();
    builder.finalize()
}

fn sha(name: &str) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(name.as_bytes()))
}

#[test]
fn test_awesome_token_hashed_roundtrip() -> anyhow::Result<()> {
    let cell = encode_pairs(
        [("name", "Awesome Token"), ("symbol", "AWS")],
        KeyVariant::HashedKey,
    )?;
    let decoded = TokenMetadata::decode(&cell, KeyVariant::HashedKey)?;
    assert_eq!(decoded, awesome_token());
    assert_eq!(decoded.description, None);
    assert_eq!(decoded.image, None);
    Ok(())
}

#[test]
fn test_all_fields_roundtrip_both_variants() -> anyhow::Result<()> {
    let metadata = full_token();
    for variant in VARIANTS {
        let cell = metadata.encode(variant)?;
        assert_eq!(TokenMetadata::decode(&cell, variant)?, metadata, "{}", variant);
    }
    Ok(())
}

#[test]
fn test_unknown_key_rejected_on_encode() {
    for variant in VARIANTS {
        assert_eq!(
            encode_pairs([("weight", "1")], variant).unwrap_err(),
            CodecError::UnsupportedKey("weight".to_string())
        );
    }
}

#[test]
fn test_empty_cell_has_no_marker() {
    for variant in VARIANTS {
        assert_eq!(
            TokenMetadata::decode(&Cell::empty(), variant).unwrap_err(),
            CodecError::ExpectedOnchainMarker { found: None }
        );
    }
}

#[test]
fn test_offchain_marker_rejected() {
    let mut builder = Builder::new();
    builder.store_uint(0x01, 8).unwrap();
    builder.store_bytes(b"https://example.com/meta.json").unwrap();
    assert_eq!(
        TokenMetadata::decode(&builder.finalize(), KeyVariant::HashedKey).unwrap_err(),
        CodecError::ExpectedOnchainMarker { found: Some(0x01) }
    );
}

#[test]
fn test_chunked_value_format_rejected() {
    let content = content_with(vec![(sha("name"), snake_value(0x01, "Awesome Token"))]);
    assert_eq!(
        TokenMetadata::decode(&content, KeyVariant::HashedKey).unwrap_err(),
        CodecError::UnsupportedValueFormat { found: 0x01 }
    );
}

#[test]
fn test_unknown_dictionary_keys_ignored() -> anyhow::Result<()> {
    let content = content_with(vec![
        (sha("name"), snake_value(SNAKE_PREFIX, "Awesome Token")),
        (sha("decimals"), snake_value(SNAKE_PREFIX, "9")),
        (sha("symbol"), snake_value(SNAKE_PREFIX, "AWS")),
    ]);
    assert_eq!(
        TokenMetadata::decode(&content, KeyVariant::HashedKey)?,
        awesome_token()
    );
    Ok(())
}

#[test]
fn test_variant_mismatch_yields_no_fields() -> anyhow::Result<()> {
    let cell = awesome_token().encode(KeyVariant::HashedKey)?;
    assert!(TokenMetadata::decode(&cell, KeyVariant::FullKey)?.is_empty());
    Ok(())
}

#[test]
fn test_full_key_layout() -> anyhow::Result<()> {
    let cell = awesome_token().encode(KeyVariant::FullKey)?;
    let mut slice = cell.parse();
    assert_eq!(slice.load_uint(8)?, 0);
    let dict: Dictionary<Vec<u8>> = slice.load_dict(KEY_BITS)?;
    let keys: Vec<Vec<u8>> = dict.iter().map(|(key, _)| key.clone()).collect();
    assert_eq!(
        keys,
        vec![
            MetadataField::Name.full_key(),
            MetadataField::Symbol.full_key()
        ]
    );
    Ok(())
}

#[test]
fn test_long_description_spills_into_children() -> anyhow::Result<()> {
    let metadata = full_token();
    let cell = metadata.encode(KeyVariant::HashedKey)?;
    let mut slice = cell.parse();
    slice.skip_bits(8)?;
    let dict: Dictionary<BigUint> = slice.load_dict(KEY_BITS)?;
    let description = dict
        .get(&MetadataField::Description.hashed_key())
        .ok_or_else(|| anyhow::anyhow!("description missing"))?;
    assert_eq!(description.references().len(), 1);
    assert_eq!(description.bit_len(), 8 + 126 * 8);
    Ok(())
}

#[test]
fn test_serde_form_omits_absent_fields() -> anyhow::Result<()> {
    let json = serde_json::to_string(&awesome_token())?;
    assert_eq!(json, r#"{"name":"Awesome Token","symbol":"AWS"}"#);
    let back: TokenMetadata = serde_json::from_str(&json)?;
    assert_eq!(back, awesome_token());
    Ok(())
}

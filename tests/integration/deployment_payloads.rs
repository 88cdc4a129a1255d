//! Deployment Payload Tests
//!
//! Builds every cell a jetton deployment needs (minter data with on-chain
//! content, bonded-curve data, the mint and content-update bodies), moves
//! them through BOC the way they travel to and from the network, and reads
//! them back.

use crate::common::{awesome_token, curve_address, full_token, minter_address};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jetton_codec::cell::{boc, Builder, Cell};
use jetton_codec::message::{ChangeContent, ContractFamily, Message, MessageBody, Mint};
use jetton_codec::metadata::{KeyVariant, TokenMetadata};
use jetton_codec::state::{CurveData, MinterData};
use jetton_codec::utils::currency::to_nanos;

fn wallet_code() -> Cell {
    let mut builder = Builder::new();
    builder.store_bytes(&[0xff, 0x00, 0xf4, 0xa4, 0x13, 0xf4, 0xbc, 0xf2]).unwrap();
    builder.finalize()
}

fn through_boc(cell: &Cell, with_crc: bool) -> anyhow::Result<Cell> {
    let text = STANDARD.encode(boc::serialize(cell, with_crc));
    Ok(boc::deserialize(&STANDARD.decode(text)?)?)
}

#[test]
fn test_minter_state_init_data() -> anyhow::Result<()> {
    let content = full_token().encode(KeyVariant::HashedKey)?;
    let data = MinterData::new(minter_address(), content, wallet_code(), curve_address());
    let cell = through_boc(&data.to_cell()?, true)?;

    let parsed = MinterData::from_cell(&cell)?;
    assert_eq!(parsed, data);
    assert_eq!(parsed.total_supply, 0);
    assert_eq!(
        TokenMetadata::decode(&parsed.content, KeyVariant::HashedKey)?,
        full_token()
    );
    Ok(())
}

#[test]
fn test_curve_state_init_data() -> anyhow::Result<()> {
    let data = CurveData::new(curve_address(), minter_address());
    let cell = through_boc(&data.to_cell()?, false)?;
    let parsed = CurveData::from_cell(&cell)?;
    assert_eq!(parsed.tokens, None);
    assert_eq!(parsed.jetton_minter, minter_address());
    Ok(())
}

#[test]
fn test_content_update_flow() -> anyhow::Result<()> {
    // current on-chain content, as fetched from the minter
    let current = full_token().encode(KeyVariant::FullKey)?;
    let fetched = through_boc(&current, true)?;
    assert_eq!(
        TokenMetadata::decode(&fetched, KeyVariant::FullKey)?,
        full_token()
    );

    // replacement content sent in a ChangeContent body
    let body = ChangeContent {
        content: awesome_token().encode(KeyVariant::FullKey)?,
    }
    .to_cell()?;
    let received = through_boc(&body, false)?;
    match Message::decode(&received, ContractFamily::Minter)? {
        Message::ChangeContent(change) => {
            let metadata = TokenMetadata::decode(&change.content, KeyVariant::FullKey)?;
            assert_eq!(metadata, awesome_token());
        }
        other => panic!("expected ChangeContent, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_mint_to_bonded_curve() -> anyhow::Result<()> {
    let jetton_amount = to_nanos("1000").ok_or_else(|| anyhow::anyhow!("bad amount"))?;
    let ton_amount = to_nanos("0.05").ok_or_else(|| anyhow::anyhow!("bad amount"))?;
    let mint = Mint::new(1, curve_address(), jetton_amount, ton_amount);

    let received = through_boc(&mint.to_cell()?, true)?;
    let decoded = Message::decode(&received, ContractFamily::Minter)?;
    assert_eq!(decoded, Message::Mint(mint));
    if let Message::Mint(mint) = decoded {
        assert_eq!(mint.jetton_amount(), 1_000_000_000_000);
        assert_eq!(mint.transfer.response_address, curve_address());
    }
    Ok(())
}

#[test]
fn test_shared_subtrees_stored_once() -> anyhow::Result<()> {
    let content = awesome_token().encode(KeyVariant::HashedKey)?;
    let mut builder = Builder::new();
    builder
        .store_ref(content.clone())?
        .store_ref(content.clone())?;
    let root = builder.finalize();

    let unique = boc::serialize(&root, false);
    let single = boc::serialize(&content, false);
    // root plus the shared content tree
    assert_eq!(unique[6], single[6] + 1);
    assert_eq!(boc::deserialize(&unique)?, root);
    Ok(())
}

//! Message bodies for the minter and the bonded curve

use crate::common::{awesome_token, curve_address, minter_address, MINTER_FRIENDLY};
use jetton_codec::cell::{Address, Builder, Cell};
use jetton_codec::errors::{AppError, CodecError};
use jetton_codec::message::{
    op, BuyTokens, ChangeContent, ContractFamily, CreateToken, Deploy, InternalTransfer, Message,
    MessageBody, Mint, SellTokens,
};
use jetton_codec::metadata::KeyVariant;
use jetton_codec::utils::currency::NANOS_PER_TON;

fn every_message() -> Vec<Message> {
    let recipient = Address::new(0, [0x42; 32]);
    vec![
        Message::Deploy(Deploy { query_id: 0 }),
        Message::CreateToken(CreateToken {
            query_id: 1,
            community_admin: recipient,
            fee_recipient: minter_address(),
            initial_liquidity: 10 * NANOS_PER_TON,
        }),
        Message::ChangeContent(ChangeContent {
            content: awesome_token().encode(KeyVariant::HashedKey).unwrap(),
        }),
        Message::Mint(Mint::new(1, recipient, 1000 * NANOS_PER_TON, NANOS_PER_TON / 20)),
        Message::BuyTokens(BuyTokens {
            query_id: 2,
            token_address: minter_address(),
        }),
        Message::SellTokens(SellTokens {
            query_id: 3,
            token_address: minter_address(),
            amount: 250 * NANOS_PER_TON,
        }),
    ]
}

#[test]
fn test_mint_scenario() -> anyhow::Result<()> {
    let to_address = curve_address();
    let jetton_amount = 1000 * NANOS_PER_TON;
    let cell = Mint::new(1, to_address, jetton_amount, NANOS_PER_TON / 20).to_cell()?;

    let mut outer = cell.parse();
    assert_eq!(outer.load_uint(32)?, 21);
    assert_eq!(outer.load_uint(64)?, 1);
    assert_eq!(outer.load_address()?, Some(to_address));

    let nested = InternalTransfer::from_cell(cell.reference(0).unwrap())?;
    assert_eq!(nested.jetton_amount, 1_000_000_000_000);
    assert_eq!(nested.query_id, 1);
    Ok(())
}

#[test]
fn test_every_message_roundtrips_in_its_family() -> anyhow::Result<()> {
    for message in every_message() {
        let cell = message.to_cell()?;
        let decoded = Message::decode(&cell, message.family())?;
        assert_eq!(decoded, message, "{}", message.kind());
        assert_eq!(cell.parse().load_uint(32)? as u32, message.kind().opcode());
    }
    Ok(())
}

#[test]
fn test_opcode_collision_resolved_by_family() -> anyhow::Result<()> {
    let change = Message::ChangeContent(ChangeContent {
        content: Cell::empty(),
    })
    .to_cell()?;
    assert_eq!(change.parse().load_uint(32)? as u32, op::CHANGE_CONTENT);
    assert_eq!(op::CHANGE_CONTENT, op::SELL_TOKENS);

    assert!(matches!(
        Message::decode(&change, ContractFamily::Minter)?,
        Message::ChangeContent(_)
    ));
    // read as a sell order the body is far too short
    assert!(matches!(
        Message::decode(&change, ContractFamily::BondedCurve),
        Err(CodecError::Underflow { .. })
    ));
    Ok(())
}

#[test]
fn test_unknown_opcode_in_family() {
    let mut builder = Builder::new();
    builder
        .store_uint(u64::from(op::MINT), 32)
        .unwrap()
        .store_uint(0, 64)
        .unwrap();
    assert_eq!(
        Message::decode(&builder.finalize(), ContractFamily::BondedCurve),
        Err(CodecError::UnknownOpcode {
            family: "bonded-curve",
            opcode: 21,
        })
    );
}

#[test]
fn test_json_roundtrip_every_message() -> anyhow::Result<()> {
    for message in every_message() {
        let json = message.to_json()?;
        assert!(json.contains(&format!("\"type\": \"{}\"", message.kind())));
        assert_eq!(Message::from_json(&json)?, message);
    }
    Ok(())
}

#[test]
fn test_json_mint_with_ton_suffix() -> anyhow::Result<()> {
    let to = minter_address();
    let json = format!(
        r#"{{
            "type": "Mint",
            "query_id": 1,
            "to_address": "{to}",
            "ton_amount": "0.05 TON",
            "transfer": {{
                "query_id": 1,
                "jetton_amount": "1000 TON",
                "response_address": "{to}"
            }}
        }}"#,
        to = MINTER_FRIENDLY
    );
    let message = Message::from_json(&json)?;
    assert_eq!(
        message,
        Message::Mint(Mint::new(1, to, 1000 * NANOS_PER_TON, NANOS_PER_TON / 20))
    );
    Ok(())
}

#[test]
fn test_json_unsupported_type() {
    let err = Message::from_json(r#"{"type": "Burn"}"#).unwrap_err();
    assert!(matches!(
        err,
        AppError::Codec(CodecError::UnsupportedMessageType(ref kind)) if kind == "Burn"
    ));

    let err = Message::from_json(r#"{"query_id": 1}"#).unwrap_err();
    assert!(matches!(
        err,
        AppError::Codec(CodecError::UnsupportedMessageType(_))
    ));
}

#[test]
fn test_json_bad_field_is_invalid_input() {
    let err = Message::from_json(r#"{"type": "Deploy", "query_id": "soon"}"#).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

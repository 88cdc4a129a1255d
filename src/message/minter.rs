//! Jetton minter messages

use super::{op, MessageBody};
use crate::cell::boc::{serde_base64, serde_base64_option};
use crate::cell::{Address, Builder, Cell, Slice};
use crate::errors::CodecResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deploy {
    pub query_id: u64,
}

impl MessageBody for Deploy {
    const OPCODE: u32 = op::DEPLOY;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder.store_uint(self.query_id, 64)?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            query_id: slice.load_uint(64)?,
        })
    }
}

/// Register a community token with its initial liquidity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateToken {
    pub query_id: u64,
    pub community_admin: Address,
    pub fee_recipient: Address,
    #[serde(with = "super::serde_amount")]
    pub initial_liquidity: u128,
}

impl MessageBody for CreateToken {
    const OPCODE: u32 = op::CREATE_TOKEN;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder
            .store_uint(self.query_id, 64)?
            .store_address(Some(&self.community_admin))?
            .store_address(Some(&self.fee_recipient))?
            .store_coins(self.initial_liquidity)?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            query_id: slice.load_uint(64)?,
            community_admin: slice.load_required_address("community_admin")?,
            fee_recipient: slice.load_required_address("fee_recipient")?,
            initial_liquidity: slice.load_coins()?,
        })
    }
}

/// Replace the minter's content cell
///
/// The deployed minter reads `op` and then the content reference directly;
/// this body has no query id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeContent {
    #[serde(with = "serde_base64")]
    pub content: Cell,
}

impl MessageBody for ChangeContent {
    const OPCODE: u32 = op::CHANGE_CONTENT;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder.store_ref(self.content.clone())?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            content: slice.load_ref()?.clone(),
        })
    }
}

/// Transfer notification the minter forwards to the recipient's wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalTransfer {
    pub query_id: u64,
    #[serde(with = "super::serde_amount")]
    pub jetton_amount: u128,
    #[serde(default)]
    pub from_address: Option<Address>,
    pub response_address: Address,
    #[serde(with = "super::serde_amount", default)]
    pub forward_ton_amount: u128,
    #[serde(with = "serde_base64_option", default)]
    pub forward_payload: Option<Cell>,
}

impl MessageBody for InternalTransfer {
    const OPCODE: u32 = op::INTERNAL_TRANSFER;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder
            .store_uint(self.query_id, 64)?
            .store_coins(self.jetton_amount)?
            .store_address(self.from_address.as_ref())?
            .store_address(Some(&self.response_address))?
            .store_coins(self.forward_ton_amount)?;
        // Either Cell ^Cell: inline-empty or a reference
        builder.store_maybe_ref(self.forward_payload.clone())?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            query_id: slice.load_uint(64)?,
            jetton_amount: slice.load_coins()?,
            from_address: slice.load_address()?,
            response_address: slice.load_required_address("response_address")?,
            forward_ton_amount: slice.load_coins()?,
            forward_payload: slice.load_maybe_ref()?.cloned(),
        })
    }
}

/// Mint jettons to `to_address`
///
/// `ton_amount` is what the minter attaches to the wallet deployment; the
/// jetton amount travels in the nested [`InternalTransfer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub query_id: u64,
    pub to_address: Address,
    #[serde(with = "super::serde_amount")]
    pub ton_amount: u128,
    pub transfer: InternalTransfer,
}

impl Mint {
    /// Mint with no sender, the recipient as response address and no
    /// forwarded payload
    pub fn new(query_id: u64, to_address: Address, jetton_amount: u128, ton_amount: u128) -> Self {
        Self {
            query_id,
            to_address,
            ton_amount,
            transfer: InternalTransfer {
                query_id,
                jetton_amount,
                from_address: None,
                response_address: to_address,
                forward_ton_amount: 0,
                forward_payload: None,
            },
        }
    }

    pub fn jetton_amount(&self) -> u128 {
        self.transfer.jetton_amount
    }
}

impl MessageBody for Mint {
    const OPCODE: u32 = op::MINT;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder
            .store_uint(self.query_id, 64)?
            .store_address(Some(&self.to_address))?
            .store_coins(self.ton_amount)?
            .store_ref(self.transfer.to_cell()?)?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        let query_id = slice.load_uint(64)?;
        let to_address = slice.load_required_address("to_address")?;
        let ton_amount = slice.load_coins()?;
        let transfer = InternalTransfer::from_cell(slice.load_ref()?)?;
        Ok(Self {
            query_id,
            to_address,
            ton_amount,
            transfer,
        })
    }
}

//! Bonded curve messages

use super::{op, MessageBody};
use crate::cell::{Address, Builder, Slice};
use crate::errors::CodecResult;
use serde::{Deserialize, Serialize};

/// Buy `token_address` jettons with the attached value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyTokens {
    pub query_id: u64,
    pub token_address: Address,
}

impl MessageBody for BuyTokens {
    const OPCODE: u32 = op::BUY_TOKENS;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder
            .store_uint(self.query_id, 64)?
            .store_address(Some(&self.token_address))?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            query_id: slice.load_uint(64)?,
            token_address: slice.load_required_address("token_address")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellTokens {
    pub query_id: u64,
    pub token_address: Address,
    #[serde(with = "super::serde_amount")]
    pub amount: u128,
}

impl MessageBody for SellTokens {
    const OPCODE: u32 = op::SELL_TOKENS;

    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()> {
        builder
            .store_uint(self.query_id, 64)?
            .store_address(Some(&self.token_address))?
            .store_coins(self.amount)?;
        Ok(())
    }

    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self> {
        Ok(Self {
            query_id: slice.load_uint(64)?,
            token_address: slice.load_required_address("token_address")?,
            amount: slice.load_coins()?,
        })
    }
}

//! Initial data cells of the deployed contracts
//!
//! These are the `data` half of a contract's state init: what the minter and
//! the bonded curve find in persistent storage on their first run.

use crate::cell::boc::{serde_base64, serde_base64_option};
use crate::cell::{Address, Builder, Cell};
use crate::errors::CodecResult;
use serde::{Deserialize, Serialize};

/// Jetton minter storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterData {
    #[serde(with = "crate::message::serde_amount", default)]
    pub total_supply: u128,
    pub admin: Address,
    #[serde(with = "serde_base64")]
    pub content: Cell,
    #[serde(with = "serde_base64")]
    pub wallet_code: Cell,
    pub bonded_curve: Address,
}

impl MinterData {
    /// Fresh minter: nothing minted yet
    pub fn new(admin: Address, content: Cell, wallet_code: Cell, bonded_curve: Address) -> Self {
        Self {
            total_supply: 0,
            admin,
            content,
            wallet_code,
            bonded_curve,
        }
    }

    pub fn to_cell(&self) -> CodecResult<Cell> {
        let mut builder = Builder::new();
        builder
            .store_coins(self.total_supply)?
            .store_address(Some(&self.admin))?
            .store_ref(self.content.clone())?
            .store_ref(self.wallet_code.clone())?
            .store_address(Some(&self.bonded_curve))?;
        Ok(builder.finalize())
    }

    pub fn from_cell(cell: &Cell) -> CodecResult<Self> {
        let mut slice = cell.parse();
        Ok(Self {
            total_supply: slice.load_coins()?,
            admin: slice.load_required_address("admin")?,
            content: slice.load_ref()?.clone(),
            wallet_code: slice.load_ref()?.clone(),
            bonded_curve: slice.load_required_address("bonded_curve")?,
        })
    }
}

/// Bonded curve storage
///
/// `tokens` is the curve's per-token dictionary, kept as its raw root cell;
/// a freshly deployed curve has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveData {
    pub admin: Address,
    pub jetton_minter: Address,
    #[serde(with = "serde_base64_option", default)]
    pub tokens: Option<Cell>,
}

impl CurveData {
    pub fn new(admin: Address, jetton_minter: Address) -> Self {
        Self {
            admin,
            jetton_minter,
            tokens: None,
        }
    }

    pub fn to_cell(&self) -> CodecResult<Cell> {
        let mut builder = Builder::new();
        builder
            .store_address(Some(&self.admin))?
            .store_address(Some(&self.jetton_minter))?
            .store_maybe_ref(self.tokens.clone())?;
        Ok(builder.finalize())
    }

    pub fn from_cell(cell: &Cell) -> CodecResult<Self> {
        let mut slice = cell.parse();
        Ok(Self {
            admin: slice.load_required_address("admin")?,
            jetton_minter: slice.load_required_address("jetton_minter")?,
            tokens: slice.load_maybe_ref()?.cloned(),
        })
    }
}

//! Contract-call message bodies
//!
//! Every body starts with a 32-bit opcode. Opcodes are only unique within a
//! contract family (`4` is `ChangeContent` on the minter and `SellTokens` on
//! the bonded curve), so decoding always needs to know which contract the
//! body is addressed to.

pub mod curve;
pub mod minter;

pub use curve::{BuyTokens, SellTokens};
pub use minter::{ChangeContent, CreateToken, Deploy, InternalTransfer, Mint};

use crate::cell::{Builder, Cell, Slice};
use crate::errors::{AppError, AppResult, CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Opcodes by contract
pub mod op {
    pub const DEPLOY: u32 = 0;
    pub const CREATE_TOKEN: u32 = 1;
    pub const CHANGE_CONTENT: u32 = 4;
    pub const MINT: u32 = 21;
    pub const INTERNAL_TRANSFER: u32 = 0x178d4519;

    pub const BUY_TOKENS: u32 = 3;
    pub const SELL_TOKENS: u32 = 4;
}

/// Fixed-layout body identified by its opcode
pub trait MessageBody: Sized {
    const OPCODE: u32;

    /// Store everything after the opcode
    fn store_fields(&self, builder: &mut Builder) -> CodecResult<()>;

    /// Load everything after the opcode
    fn load_fields(slice: &mut Slice<'_>) -> CodecResult<Self>;

    fn to_cell(&self) -> CodecResult<Cell> {
        let mut builder = Builder::new();
        builder.store_uint(u64::from(Self::OPCODE), 32)?;
        self.store_fields(&mut builder)?;
        Ok(builder.finalize())
    }

    /// Parse a standalone body, checking its opcode
    fn from_cell(cell: &Cell) -> CodecResult<Self> {
        let mut slice = cell.parse();
        let found = slice.load_uint(32)? as u32;
        if found != Self::OPCODE {
            return Err(CodecError::UnexpectedOpcode {
                expected: Self::OPCODE,
                found,
            });
        }
        Self::load_fields(&mut slice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractFamily {
    Minter,
    BondedCurve,
}

impl ContractFamily {
    pub fn name(&self) -> &'static str {
        match self {
            ContractFamily::Minter => "minter",
            ContractFamily::BondedCurve => "bonded-curve",
        }
    }
}

impl FromStr for ContractFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minter" | "jetton-minter" => Ok(ContractFamily::Minter),
            "curve" | "bonded-curve" | "bonded_curve" => Ok(ContractFamily::BondedCurve),
            _ => Err(format!(
                "unknown contract family '{}', expected minter or curve",
                s
            )),
        }
    }
}

impl fmt::Display for ContractFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Deploy,
    CreateToken,
    ChangeContent,
    Mint,
    BuyTokens,
    SellTokens,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Deploy,
        MessageKind::CreateToken,
        MessageKind::ChangeContent,
        MessageKind::Mint,
        MessageKind::BuyTokens,
        MessageKind::SellTokens,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::Deploy => "Deploy",
            MessageKind::CreateToken => "CreateToken",
            MessageKind::ChangeContent => "ChangeContent",
            MessageKind::Mint => "Mint",
            MessageKind::BuyTokens => "BuyTokens",
            MessageKind::SellTokens => "SellTokens",
        }
    }

    pub fn opcode(&self) -> u32 {
        match self {
            MessageKind::Deploy => op::DEPLOY,
            MessageKind::CreateToken => op::CREATE_TOKEN,
            MessageKind::ChangeContent => op::CHANGE_CONTENT,
            MessageKind::Mint => op::MINT,
            MessageKind::BuyTokens => op::BUY_TOKENS,
            MessageKind::SellTokens => op::SELL_TOKENS,
        }
    }

    pub fn family(&self) -> ContractFamily {
        match self {
            MessageKind::BuyTokens | MessageKind::SellTokens => ContractFamily::BondedCurve,
            _ => ContractFamily::Minter,
        }
    }

    /// Look up the variant an opcode selects within `family`
    pub fn from_opcode(family: ContractFamily, opcode: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.family() == family && kind.opcode() == opcode)
    }
}

impl FromStr for MessageKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CodecError::UnsupportedMessageType(s.to_string()))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any message this crate can frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    Deploy(Deploy),
    CreateToken(CreateToken),
    ChangeContent(ChangeContent),
    Mint(Mint),
    BuyTokens(BuyTokens),
    SellTokens(SellTokens),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Deploy(_) => MessageKind::Deploy,
            Message::CreateToken(_) => MessageKind::CreateToken,
            Message::ChangeContent(_) => MessageKind::ChangeContent,
            Message::Mint(_) => MessageKind::Mint,
            Message::BuyTokens(_) => MessageKind::BuyTokens,
            Message::SellTokens(_) => MessageKind::SellTokens,
        }
    }

    pub fn family(&self) -> ContractFamily {
        self.kind().family()
    }

    pub fn to_cell(&self) -> CodecResult<Cell> {
        debug!("Encoding {} message for {}", self.kind(), self.family());
        match self {
            Message::Deploy(body) => body.to_cell(),
            Message::CreateToken(body) => body.to_cell(),
            Message::ChangeContent(body) => body.to_cell(),
            Message::Mint(body) => body.to_cell(),
            Message::BuyTokens(body) => body.to_cell(),
            Message::SellTokens(body) => body.to_cell(),
        }
    }

    /// Read the opcode and dispatch within `family`
    pub fn decode(cell: &Cell, family: ContractFamily) -> CodecResult<Self> {
        let mut slice = cell.parse();
        let opcode = slice.load_uint(32)? as u32;
        let kind = MessageKind::from_opcode(family, opcode).ok_or(CodecError::UnknownOpcode {
            family: family.name(),
            opcode,
        })?;
        debug!("Decoding {} message (opcode {}) for {}", kind, opcode, family);

        let message = match kind {
            MessageKind::Deploy => Message::Deploy(Deploy::load_fields(&mut slice)?),
            MessageKind::CreateToken => Message::CreateToken(CreateToken::load_fields(&mut slice)?),
            MessageKind::ChangeContent => {
                Message::ChangeContent(ChangeContent::load_fields(&mut slice)?)
            }
            MessageKind::Mint => Message::Mint(Mint::load_fields(&mut slice)?),
            MessageKind::BuyTokens => Message::BuyTokens(BuyTokens::load_fields(&mut slice)?),
            MessageKind::SellTokens => Message::SellTokens(SellTokens::load_fields(&mut slice)?),
        };
        Ok(message)
    }

    /// Parse the tagged JSON form, e.g. `{"type": "Deploy", "query_id": 0}`
    ///
    /// A `type` naming no known message fails with
    /// [`CodecError::UnsupportedMessageType`] before any field is looked at.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let tag = value
            .get("type")
            .and_then(|tag| tag.as_str())
            .ok_or_else(|| CodecError::UnsupportedMessageType("<missing>".to_string()))?
            .to_string();
        MessageKind::from_str(&tag)?;
        serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("invalid {} message: {}", tag, e)))
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serde adapter for coin amounts
///
/// Written as a decimal string of nano-units. Read from a JSON integer, a
/// nano-unit string, or a decimal string with a ` TON` suffix. JSON numbers
/// above `u64::MAX` lose precision in transit, so amounts that large must be
/// given as strings.
pub mod serde_amount {
    use crate::utils::currency::to_nanos;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a nano-unit integer, or a string such as \"1500\" or \"1.5 TON\"")
        }

        fn visit_u64<E: de::Error>(self, nanos: u64) -> Result<u128, E> {
            Ok(u128::from(nanos))
        }

        fn visit_u128<E: de::Error>(self, nanos: u128) -> Result<u128, E> {
            Ok(nanos)
        }

        fn visit_i64<E: de::Error>(self, nanos: i64) -> Result<u128, E> {
            u128::try_from(nanos)
                .map_err(|_| E::custom(format!("coin amount {} is negative", nanos)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u128, E> {
            Err(E::custom(format!(
                "coin amount {} is not an exact integer; write large or fractional amounts as strings",
                value
            )))
        }

        fn visit_str<E: de::Error>(self, text: &str) -> Result<u128, E> {
            let text = text.trim();
            let parsed = match text.strip_suffix("TON") {
                Some(coins) => to_nanos(coins.trim()),
                None => text.parse().ok(),
            };
            parsed.ok_or_else(|| E::custom(format!("invalid coin amount '{}'", text)))
        }
    }

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

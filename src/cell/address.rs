//! Workchain-qualified contract address
//!
//! On the wire an address is `addr_std`: tag `10`, anycast bit `0`, 8-bit
//! workchain, 256-bit account hash. The codec never interprets the hash; it
//! only has to round-trip it bit for bit.
//!
//! Two text forms are accepted:
//! - raw: `0:7a27f276...9ca4`
//! - user-friendly: 48 base64 (or base64url) characters wrapping
//!   `[flags][workchain][hash:32][crc16:2]`, e.g.
//!   `EQB6J_J2gdFW9zV9SP4D7xVdh0YRfIzKSq7D-rgXmhycpPoq`

use crate::errors::{CodecError, CodecResult};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Bits occupied by a serialized `addr_std` without anycast
pub const ADDRESS_BITS: usize = 2 + 1 + 8 + 256;

const FLAG_BOUNCEABLE: u8 = 0x11;
const FLAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TESTNET: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    workchain: i8,
    hash: [u8; 32],
}

impl Address {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Parse `<workchain>:<64 hex chars>`
    pub fn parse_raw(text: &str) -> CodecResult<Self> {
        let (workchain, hash_hex) = text
            .split_once(':')
            .ok_or_else(|| CodecError::InvalidAddress(format!("missing ':' in {}", text)))?;
        let workchain: i8 = workchain
            .parse()
            .map_err(|_| CodecError::InvalidAddress(format!("bad workchain in {}", text)))?;
        let bytes = hex::decode(hash_hex)
            .map_err(|e| CodecError::InvalidAddress(format!("bad hash hex in {}: {}", text, e)))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            CodecError::InvalidAddress(format!("hash must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::new(workchain, hash))
    }

    /// Parse the 48-character user-friendly form (either base64 alphabet)
    pub fn parse_friendly(text: &str) -> CodecResult<Self> {
        if text.len() != 48 {
            return Err(CodecError::InvalidAddress(format!(
                "friendly address must be 48 characters, got {}",
                text.len()
            )));
        }
        let bytes = if text.contains('-') || text.contains('_') {
            URL_SAFE.decode(text)
        } else {
            STANDARD.decode(text)
        }
        .map_err(|e| CodecError::InvalidAddress(format!("bad base64 in {}: {}", text, e)))?;

        if bytes.len() != 36 {
            return Err(CodecError::InvalidAddress(format!(
                "friendly address must decode to 36 bytes, got {}",
                bytes.len()
            )));
        }

        let flags = bytes[0] & !FLAG_TESTNET;
        if flags != FLAG_BOUNCEABLE && flags != FLAG_NON_BOUNCEABLE {
            return Err(CodecError::InvalidAddress(format!(
                "unknown address flags 0x{:02x}",
                bytes[0]
            )));
        }

        let stored = u16::from_be_bytes([bytes[34], bytes[35]]);
        let computed = crc16(&bytes[..34]);
        if stored != computed {
            return Err(CodecError::InvalidAddress(format!(
                "checksum mismatch: stored {:04x}, computed {:04x}",
                stored, computed
            )));
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(Self::new(bytes[1] as i8, hash))
    }

    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Render the base64url user-friendly form
    pub fn to_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut flags = if bounceable {
            FLAG_BOUNCEABLE
        } else {
            FLAG_NON_BOUNCEABLE
        };
        if testnet {
            flags |= FLAG_TESTNET;
        }
        let mut bytes = Vec::with_capacity(36);
        bytes.push(flags);
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.hash);
        let crc = crc16(&bytes);
        bytes.extend_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(bytes)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.contains(':') {
            Self::parse_raw(text)
        } else {
            Self::parse_friendly(text)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_raw_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// CRC-16/XMODEM as used by the friendly address checksum
fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

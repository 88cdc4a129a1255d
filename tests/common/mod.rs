//! Common Test Utilities
//!
//! Shared fixtures and helpers used across unit and integration tests.

#![allow(dead_code)]

use jetton_codec::cell::{Address, Cell};
use jetton_codec::metadata::TokenMetadata;

/// Empty cell as a CRC-less base64 BOC
pub const EMPTY_CELL_BOC: &str = "te6ccgEBAQEAAgAAAA==";

/// Deployed jetton minter (bounceable, mainnet)
pub const MINTER_FRIENDLY: &str = "EQB6J_J2gdFW9zV9SP4D7xVdh0YRfIzKSq7D-rgXmhycpPoq";

/// Deployed bonded curve (bounceable, mainnet)
pub const CURVE_FRIENDLY: &str = "EQAeEAKyetWBNUp0CeTDYHeukL3emOWCH7qNPLQV3an6nEUw";

pub fn minter_address() -> Address {
    MINTER_FRIENDLY.parse().unwrap()
}

pub fn curve_address() -> Address {
    CURVE_FRIENDLY.parse().unwrap()
}

/// Metadata used by the content-update script
pub fn awesome_token() -> TokenMetadata {
    TokenMetadata {
        name: Some("Awesome Token".to_string()),
        symbol: Some("AWS".to_string()),
        ..Default::default()
    }
}

/// Metadata with every field set, description long enough to spill into a
/// second cell
pub fn full_token() -> TokenMetadata {
    TokenMetadata {
        name: Some("Community Jetton ✨".to_string()),
        description: Some("A community token on a bonded curve. ".repeat(8)),
        image: Some("https://example.com/jetton/logo.png".to_string()),
        symbol: Some("CJT".to_string()),
    }
}

/// Parse `"0101"` into bits
pub fn bits(text: &str) -> Vec<bool> {
    text.chars().map(|c| c == '1').collect()
}

/// Render a cell's payload as `"0101"`
pub fn cell_bits(cell: &Cell) -> String {
    cell.parse()
        .load_bits(cell.bit_len())
        .unwrap()
        .into_iter()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

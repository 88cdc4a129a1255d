//! TON Jetton cell codec
//!
//! Bit-exact encoding and decoding of the cells a Jetton deployment works
//! with: on-chain token metadata, contract initial data and message bodies.

pub mod cell;
pub mod cli;
pub mod config;
pub mod dict;
pub mod errors;
pub mod message;
pub mod metadata;
pub mod state;
pub mod utils;

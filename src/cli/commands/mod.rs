pub mod inspect;
pub mod message;
pub mod metadata;

use crate::cell::{boc, Cell};
use crate::config::{AppConfig, OutputFormat};
use crate::errors::AppResult;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::Serialize;
use std::io::Read;

// ===== Helper Functions =====

/// Parse a BOC given as hex (`b5ee9c72...`) or base64 (`te6cc...`)
pub fn parse_boc_arg(text: &str) -> AppResult<Cell> {
    let text = text.trim();
    let is_hex = text
        .get(..8)
        .is_some_and(|magic| magic.eq_ignore_ascii_case("b5ee9c72"));
    let bytes = if is_hex {
        hex::decode(text)?
    } else if text.contains('-') || text.contains('_') {
        URL_SAFE.decode(text)?
    } else {
        STANDARD.decode(text)?
    };
    Ok(boc::deserialize(&bytes)?)
}

/// Serialize a cell as a base64 BOC, with a CRC32C when configured
pub fn render_boc(cell: &Cell, config: &AppConfig) -> String {
    STANDARD.encode(boc::serialize(cell, config.codec.boc_crc32c))
}

/// Read an argument, or stdin when the argument is `-`
pub fn read_arg_or_stdin(arg: &str) -> AppResult<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Pick the output format from the CLI flag or the config file
pub fn resolve_format(flag: Option<OutputFormat>, config: &AppConfig) -> OutputFormat {
    flag.unwrap_or(config.output.format)
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Encoded cell summary for JSON output
#[derive(Serialize)]
pub struct EncodedCell {
    pub boc: String,
    pub hash: String,
}

impl EncodedCell {
    pub fn new(cell: &Cell, config: &AppConfig) -> Self {
        Self {
            boc: render_boc(cell, config),
            hash: hex::encode(cell.hash()),
        }
    }
}

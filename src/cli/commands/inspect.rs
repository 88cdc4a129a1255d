use super::{parse_boc_arg, print_json, resolve_format};
use crate::cell::Cell;
use crate::config::{AppConfig, OutputFormat};
use crate::errors::AppResult;
use clap::Args;
use serde::Serialize;
use std::collections::HashSet;

/// Print the structure of a BOC
#[derive(Args)]
pub struct InspectCommand {
    /// BOC as base64 or hex
    pub boc: String,

    /// Output format: text or json (overrides config)
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct CellSummary {
    hash: String,
    depth: u16,
    bits: usize,
    data: String,
    /// Set when this subtree was already listed; its children are omitted
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    shared: bool,
    references: Vec<CellSummary>,
}

impl CellSummary {
    fn new(cell: &Cell) -> Self {
        Self::collect(cell, &mut HashSet::new())
    }

    fn collect(cell: &Cell, listed: &mut HashSet<[u8; 32]>) -> Self {
        let shared = !cell.references().is_empty() && !listed.insert(cell.hash());
        let references = if shared {
            Vec::new()
        } else {
            cell.references()
                .iter()
                .map(|child| Self::collect(child, listed))
                .collect()
        };
        Self {
            hash: hex::encode(cell.hash()),
            depth: cell.depth(),
            bits: cell.bit_len(),
            data: cell.data_hex(),
            shared,
            references,
        }
    }
}

impl InspectCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::get_defaults();
        let cell = parse_boc_arg(&self.boc)?;

        match resolve_format(self.format, &config) {
            OutputFormat::Json => print_json(&CellSummary::new(&cell))?,
            OutputFormat::Text => {
                print!("{}", cell);
                println!("depth: {}", cell.depth());
                println!("hash:  {}", hex::encode(cell.hash()));
            }
        }
        Ok(())
    }
}

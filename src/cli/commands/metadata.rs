use super::{parse_boc_arg, print_json, render_boc, resolve_format, EncodedCell};
use crate::config::{AppConfig, OutputFormat};
use crate::errors::AppResult;
use crate::metadata::{KeyVariant, TokenMetadata};
use clap::{Args, Subcommand};
use tracing::info;

/// On-chain token metadata commands
#[derive(Args)]
pub struct MetadataCommand {
    #[command(subcommand)]
    pub action: MetadataAction,
}

#[derive(Subcommand)]
pub enum MetadataAction {
    /// Build a content cell from metadata fields and print it as a base64 BOC
    Encode {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Image URL (ASCII only)
        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        symbol: Option<String>,

        /// Dictionary key layout: hashed or full (overrides config)
        #[arg(long)]
        keys: Option<KeyVariant>,

        /// Output format: text or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Parse a content cell BOC (base64 or hex) into metadata fields
    Decode {
        boc: String,

        /// Dictionary key layout: hashed or full (overrides config)
        #[arg(long)]
        keys: Option<KeyVariant>,

        /// Output format: text or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

impl MetadataCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::get_defaults();
        match &self.action {
            MetadataAction::Encode {
                name,
                description,
                image,
                symbol,
                keys,
                format,
            } => {
                let pairs = [
                    ("name", name),
                    ("description", description),
                    ("image", image),
                    ("symbol", symbol),
                ];
                let metadata = TokenMetadata::from_pairs(
                    pairs
                        .into_iter()
                        .filter_map(|(key, value)| value.clone().map(|value| (key, value))),
                )?;
                let variant = keys.unwrap_or(config.codec.key_variant);
                info!("Encoding metadata with {} keys", variant);
                let cell = metadata.encode(variant)?;

                match resolve_format(*format, &config) {
                    OutputFormat::Json => print_json(&EncodedCell::new(&cell, &config))?,
                    OutputFormat::Text => println!("{}", render_boc(&cell, &config)),
                }
                Ok(())
            }
            MetadataAction::Decode { boc, keys, format } => {
                let cell = parse_boc_arg(boc)?;
                let variant = keys.unwrap_or(config.codec.key_variant);
                let metadata = TokenMetadata::decode(&cell, variant)?;

                match resolve_format(*format, &config) {
                    OutputFormat::Json => print_json(&metadata)?,
                    OutputFormat::Text => {
                        if metadata.is_empty() {
                            println!("(no metadata fields)");
                        }
                        for (field, value) in metadata.fields() {
                            println!("{}: {}", field, value);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

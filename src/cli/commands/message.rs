use super::{parse_boc_arg, print_json, read_arg_or_stdin, render_boc, resolve_format, EncodedCell};
use crate::config::{AppConfig, OutputFormat};
use crate::errors::AppResult;
use crate::message::{ContractFamily, Message};
use crate::utils::currency::format_nanos;
use clap::{Args, Subcommand};
use tracing::info;

/// Message body commands
#[derive(Args)]
pub struct MessageCommand {
    #[command(subcommand)]
    pub action: MessageAction,
}

#[derive(Subcommand)]
pub enum MessageAction {
    /// Encode a JSON message such as {"type":"Deploy","query_id":0} into a BOC
    Encode {
        /// Message JSON, or - to read it from stdin
        json: String,

        /// Output format: text or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Decode a message body BOC (base64 or hex) addressed to a contract family
    Decode {
        boc: String,

        /// Receiving contract: minter or curve
        #[arg(long, default_value = "minter")]
        family: ContractFamily,

        /// Output format: text or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

impl MessageCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = AppConfig::get_defaults();
        match &self.action {
            MessageAction::Encode { json, format } => {
                let message = Message::from_json(&read_arg_or_stdin(json)?)?;
                info!("Encoding {} message", message.kind());
                let cell = message.to_cell()?;

                match resolve_format(*format, &config) {
                    OutputFormat::Json => print_json(&EncodedCell::new(&cell, &config))?,
                    OutputFormat::Text => println!("{}", render_boc(&cell, &config)),
                }
                Ok(())
            }
            MessageAction::Decode {
                boc,
                family,
                format,
            } => {
                let cell = parse_boc_arg(boc)?;
                let message = Message::decode(&cell, *family)?;

                match resolve_format(*format, &config) {
                    OutputFormat::Json => println!("{}", message.to_json()?),
                    OutputFormat::Text => {
                        for (label, value) in describe(&message) {
                            println!("{}: {}", label, value);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Field listing for text output, amounts shown in TON and nanotons
fn describe(message: &Message) -> Vec<(&'static str, String)> {
    let mut lines = vec![("type", message.kind().to_string())];
    match message {
        Message::Deploy(deploy) => lines.push(("query_id", deploy.query_id.to_string())),
        Message::CreateToken(create) => lines.extend([
            ("query_id", create.query_id.to_string()),
            ("community_admin", create.community_admin.to_string()),
            ("fee_recipient", create.fee_recipient.to_string()),
            ("initial_liquidity", format_nanos(create.initial_liquidity)),
        ]),
        Message::ChangeContent(change) => {
            lines.push(("content", hex::encode(change.content.hash())))
        }
        Message::Mint(mint) => {
            let transfer = &mint.transfer;
            lines.extend([
                ("query_id", mint.query_id.to_string()),
                ("to_address", mint.to_address.to_string()),
                ("ton_amount", format_nanos(mint.ton_amount)),
                ("jetton_amount", format_nanos(transfer.jetton_amount)),
                ("response_address", transfer.response_address.to_string()),
                ("forward_ton_amount", format_nanos(transfer.forward_ton_amount)),
            ]);
        }
        Message::BuyTokens(buy) => lines.extend([
            ("query_id", buy.query_id.to_string()),
            ("token_address", buy.token_address.to_string()),
        ]),
        Message::SellTokens(sell) => lines.extend([
            ("query_id", sell.query_id.to_string()),
            ("token_address", sell.token_address.to_string()),
            ("amount", format_nanos(sell.amount)),
        ]),
    }
    lines
}

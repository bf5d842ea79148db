// Sale account inspection

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use token_sale_sdk::{env_store::keys, token_sale_types::ACCOUNT_LAYOUT, TokenSaleAccount};

use super::{
    utils::{info, parse_pubkey, print_account, sale_client, warn},
    CommandContext,
};

#[derive(Args)]
pub struct ShowCmd {
    /// Sale account to decode (defaults to the one in the env file)
    #[arg(long)]
    sale_account: Option<String>,

    /// Print the decoded record as JSON
    #[arg(long)]
    json: bool,
}

fn account_json(account: &TokenSaleAccount) -> Value {
    let fields: Map<String, Value> = ACCOUNT_LAYOUT
        .iter()
        .map(|span| {
            (
                span.field.name().to_string(),
                Value::String(account.field_value(span.field)),
            )
        })
        .collect();
    Value::Object(fields)
}

pub async fn execute(cmd: ShowCmd, ctx: &CommandContext) -> Result<()> {
    let sale_account = match cmd.sale_account.as_deref() {
        Some(value) => parse_pubkey(value)?,
        None => ctx.env.pubkey(keys::TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY)?,
    };
    let client = sale_client(ctx)?;

    info(&format!("Program ID: {}", client.program_id()));
    info(&format!("Sale authority PDA: {}", client.sale_authority()));
    info(&format!("Sale account: {}", sale_account));

    let account = client
        .base()
        .fetch_sale_account(&sale_account)
        .await
        .context("Failed to fetch sale account")?;

    if !account.is_initialized {
        warn("Sale has not been started");
    }
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&account_json(&account))?);
    } else {
        print_account(&account);
    }

    Ok(())
}

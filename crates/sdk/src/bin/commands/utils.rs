// Utility functions for CLI commands

use std::str::FromStr;

use anyhow::{Context, Result};
use solana_sdk::pubkey::Pubkey;
use token_sale_sdk::{
    env_store::keys, token_sale_types::ACCOUNT_LAYOUT, BaseClient, EnvStore, SaleClient,
    SdkError, SdkResult, TokenSaleAccount,
};

use super::CommandContext;

/// Build a sale client for the program named in the env file
pub fn sale_client(ctx: &CommandContext) -> Result<SaleClient> {
    let program_id = program_id(&ctx.env)?;
    Ok(SaleClient::new(BaseClient::new(ctx.config.clone()), program_id))
}

pub fn program_id(env: &EnvStore) -> Result<Pubkey> {
    env.pubkey(keys::CUSTOM_PROGRAM_ID)
        .context("Failed to read program ID")
}

/// Parse a pubkey from string
pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).context("Invalid public key")
}

/// Convert an SDK failure, printing every field mismatch first
pub fn report_failure<T>(result: SdkResult<T>, action: &str) -> Result<T> {
    result.map_err(|err: SdkError| {
        for mismatch in err.mismatches() {
            error(&mismatch.to_string());
        }
        anyhow::Error::new(err).context(format!("{} failed", action))
    })
}

/// Print every field of a sale record
pub fn print_account(account: &TokenSaleAccount) {
    for span in ACCOUNT_LAYOUT.iter() {
        info(&format!(
            "{:<26} {}",
            span.field.name(),
            account.field_value(span.field)
        ));
    }
}

/// Print success message with checkmark
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("[ERROR] {}", msg);
}

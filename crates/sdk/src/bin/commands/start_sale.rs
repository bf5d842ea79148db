// Start-sale command

use anyhow::{Context, Result};
use clap::Args;
use solana_sdk::signature::Signer;
use token_sale_sdk::{
    env_store::keys,
    token_sale_types::{
        DEFAULT_INCREASE_TOKEN_PRICE, DEFAULT_MAX_TOKEN_PRICE, DEFAULT_PHASE_DELAY_TIME,
        DEFAULT_PRICE_PER_TOKEN, DEFAULT_SALE_TOKEN_AMOUNT,
    },
    StartSaleParams,
};

use super::{
    utils::{info, print_account, report_failure, sale_client, success},
    CommandContext,
};

#[derive(Args)]
pub struct StartSaleCmd {
    /// Tokens moved from the seller into escrow
    #[arg(long, default_value_t = DEFAULT_SALE_TOKEN_AMOUNT)]
    amount: u64,

    /// Starting price per token in lamports
    #[arg(long, default_value_t = DEFAULT_PRICE_PER_TOKEN)]
    price_per_token: u64,

    /// Price ceiling in lamports
    #[arg(long, default_value_t = DEFAULT_MAX_TOKEN_PRICE)]
    max_token_price: u64,

    /// Price increase per phase in lamports
    #[arg(long, default_value_t = DEFAULT_INCREASE_TOKEN_PRICE)]
    increase_token_price: u64,

    /// Phase length in seconds
    #[arg(long, default_value_t = DEFAULT_PHASE_DELAY_TIME)]
    phase_delay_time: u64,
}

impl StartSaleCmd {
    fn params(&self) -> StartSaleParams {
        StartSaleParams {
            sale_token_amount: self.amount,
            price_per_token: self.price_per_token,
            max_token_price: self.max_token_price,
            increase_token_price: self.increase_token_price,
            phase_delay_time: self.phase_delay_time,
        }
    }
}

pub async fn execute(cmd: StartSaleCmd, ctx: &mut CommandContext) -> Result<()> {
    info("Starting token sale...");

    let env = &ctx.env;
    let seller = env
        .keypair(keys::SELLER_PUBLIC_KEY, keys::SELLER_PRIVATE_KEY)
        .context("Failed to load seller keypair")?;
    let token_mint = env.pubkey(keys::TOKEN_PUBKEY)?;
    let seller_token_account = env.pubkey(keys::SELLER_TOKEN_ACCOUNT_PUBKEY)?;
    let client = sale_client(ctx)?;

    info(&format!("Program ID: {}", client.program_id()));
    info(&format!("Seller: {}", seller.pubkey()));
    info(&format!("Token mint: {}", token_mint));

    let outcome = report_failure(
        client
            .start_sale(&seller, seller_token_account, token_mint, &cmd.params())
            .await,
        "Start sale",
    )?;

    success(&format!("Token sale started! Signature: {}", outcome.signature));
    print_account(&outcome.account);

    ctx.env.set(
        keys::TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY,
        outcome.sale_account.to_string(),
    );
    ctx.env.set(
        keys::TEMP_TOKEN_ACCOUNT_PUBKEY,
        outcome.temp_token_account.to_string(),
    );
    ctx.env
        .persist()
        .with_context(|| format!("Failed to write {}", ctx.env.path().display()))?;

    success(&format!(
        "Saved sale account {} and temp token account {} to {}",
        outcome.sale_account,
        outcome.temp_token_account,
        ctx.env.path().display()
    ));

    Ok(())
}

// Airdrop command

use anyhow::{Context, Result};
use clap::Args;
use solana_sdk::signature::Signer;
use token_sale_sdk::{env_store::keys, token_sale_types::DEFAULT_AIRDROP_TOKEN_AMOUNT};

use super::{
    utils::{info, print_account, report_failure, sale_client, success, warn},
    CommandContext,
};

#[derive(Args)]
pub struct AirdropCmd {
    /// Tokens sent from escrow to the buyer
    #[arg(long, default_value_t = DEFAULT_AIRDROP_TOKEN_AMOUNT)]
    amount: u64,
}

pub async fn execute(cmd: AirdropCmd, ctx: &CommandContext) -> Result<()> {
    info("Airdropping tokens...");

    let env = &ctx.env;
    let seller = env.pubkey(keys::SELLER_PUBLIC_KEY)?;
    let buyer = env
        .keypair(keys::BUYER_PUBLIC_KEY, keys::BUYER_PRIVATE_KEY)
        .context("Failed to load buyer keypair")?;
    let token_mint = env.pubkey(keys::TOKEN_PUBKEY)?;
    let sale_account = env.pubkey(keys::TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY)?;
    let seller_token_account = env.pubkey(keys::SELLER_TOKEN_ACCOUNT_PUBKEY)?;
    let temp_token_account = env.pubkey(keys::TEMP_TOKEN_ACCOUNT_PUBKEY)?;
    let client = sale_client(ctx)?;

    info(&format!("Sale account: {}", sale_account));
    info(&format!("Buyer: {}", buyer.pubkey()));

    let outcome = report_failure(
        client
            .airdrop(&buyer, sale_account, token_mint, cmd.amount)
            .await,
        "Airdrop",
    )?;

    if outcome.before.seller_pubkey != seller {
        warn(&format!(
            "Sale account seller {} differs from {} {}",
            outcome.before.seller_pubkey,
            keys::SELLER_PUBLIC_KEY,
            seller
        ));
    }
    if outcome.before.temp_token_account_pubkey != temp_token_account {
        warn(&format!(
            "Sale account escrow {} differs from {} {}",
            outcome.before.temp_token_account_pubkey,
            keys::TEMP_TOKEN_ACCOUNT_PUBKEY,
            temp_token_account
        ));
    }

    success(&format!(
        "Airdropped {} tokens! Signature: {}",
        cmd.amount, outcome.signature
    ));
    print_account(&outcome.account);

    let report = client
        .balance_report(
            &[
                ("seller token account", seller_token_account),
                ("temp token account", outcome.account.temp_token_account_pubkey),
                ("buyer token account", outcome.buyer_token_account),
            ],
            &[("seller", seller), ("buyer", buyer.pubkey())],
        )
        .await
        .context("Failed to fetch balances")?;
    print!("{}", report);

    Ok(())
}

use log::{info, warn};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use token_sale_types::{check_account_data, TokenSaleAccount, TOKEN_SALE_ACCOUNT_LEN};

use super::BaseClient;
use crate::{
    error::{SdkError, SdkResult},
    instructions::{
        buyer_token_account, AirdropAccounts, RentExemption, StartSaleAccounts, StartSaleParams,
        TokenSaleInstructionBuilder, TOKEN_ACCOUNT_LEN,
    },
    protocol::find_sale_authority_address,
    report::{BalanceReport, BalanceRow},
};

/// Result of a confirmed and validated start-sale transaction
#[derive(Debug, Clone)]
pub struct StartSaleOutcome {
    pub signature: Signature,
    /// Newly created sale state account
    pub sale_account: Pubkey,
    /// Newly created escrow token account
    pub temp_token_account: Pubkey,
    /// Decoded sale record after confirmation
    pub account: TokenSaleAccount,
}

/// Result of a confirmed and validated airdrop transaction
#[derive(Debug, Clone)]
pub struct AirdropOutcome {
    pub signature: Signature,
    pub buyer_token_account: Pubkey,
    /// Sale record before the airdrop
    pub before: TokenSaleAccount,
    /// Sale record after confirmation
    pub account: TokenSaleAccount,
}

/// Sale record expected once an airdrop of `token_amount` lands
pub fn expected_after_airdrop(
    before: &TokenSaleAccount,
    token_amount: u64,
) -> SdkResult<TokenSaleAccount> {
    let purchased_token_amount = before
        .purchased_token_amount
        .checked_add(token_amount)
        .ok_or_else(|| {
            SdkError::InvalidParameters(format!(
                "airdrop of {} overflows purchased amount {}",
                token_amount, before.purchased_token_amount
            ))
        })?;

    Ok(TokenSaleAccount {
        purchased_token_amount,
        ..*before
    })
}

/// Client for the token sale program
pub struct SaleClient {
    base: BaseClient,
    builder: TokenSaleInstructionBuilder,
}

impl SaleClient {
    pub fn new(base: BaseClient, program_id: Pubkey) -> Self {
        Self {
            base,
            builder: TokenSaleInstructionBuilder::new(program_id),
        }
    }

    pub fn base(&self) -> &BaseClient {
        &self.base
    }

    pub fn program_id(&self) -> Pubkey {
        self.builder.program_id()
    }

    /// Sale authority PDA of this program
    pub fn sale_authority(&self) -> Pubkey {
        find_sale_authority_address(&self.builder.program_id()).0
    }

    /// Create the escrow and sale accounts, start the sale and validate the
    /// resulting record
    pub async fn start_sale(
        &self,
        seller: &Keypair,
        seller_token_account: Pubkey,
        token_mint: Pubkey,
        params: &StartSaleParams,
    ) -> SdkResult<StartSaleOutcome> {
        params.validate()?;

        let temp_token_account = Keypair::new();
        let sale_account = Keypair::new();
        info!("Temp token account: {}", temp_token_account.pubkey());
        info!("Sale account: {}", sale_account.pubkey());

        let rent = RentExemption {
            token_account_lamports: self
                .base
                .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)
                .await?,
            sale_account_lamports: self
                .base
                .get_minimum_balance_for_rent_exemption(TOKEN_SALE_ACCOUNT_LEN)
                .await?,
        };

        let accounts = StartSaleAccounts {
            seller: seller.pubkey(),
            seller_token_account,
            token_mint,
            temp_token_account: temp_token_account.pubkey(),
            sale_account: sale_account.pubkey(),
        };
        let instructions = self
            .builder
            .start_sale_transaction(&accounts, params, &rent)?;

        let signature = self
            .base
            .send_and_confirm(
                &instructions,
                seller,
                &[seller, &temp_token_account, &sale_account],
            )
            .await?;

        let account = self.base.fetch_sale_account(&accounts.sale_account).await?;
        let expected = params.expected_account(seller.pubkey(), accounts.temp_token_account);
        check_account_data(&account, &expected)?;

        Ok(StartSaleOutcome {
            signature,
            sale_account: accounts.sale_account,
            temp_token_account: accounts.temp_token_account,
            account,
        })
    }

    /// Airdrop tokens from the escrow to the buyer and validate the updated
    /// record
    pub async fn airdrop(
        &self,
        buyer: &Keypair,
        sale_account: Pubkey,
        token_mint: Pubkey,
        token_amount: u64,
    ) -> SdkResult<AirdropOutcome> {
        let before = self.base.fetch_sale_account(&sale_account).await?;
        if !before.is_initialized {
            warn!("Sale account {} has not been started", sale_account);
        }

        let accounts = AirdropAccounts {
            buyer: buyer.pubkey(),
            seller: before.seller_pubkey,
            temp_token_account: before.temp_token_account_pubkey,
            sale_account,
            buyer_token_account: buyer_token_account(&buyer.pubkey(), &token_mint),
        };
        let expected = expected_after_airdrop(&before, token_amount)?;
        let instructions = self
            .builder
            .airdrop_transaction(&accounts, &token_mint, token_amount)?;

        let signature = self
            .base
            .send_and_confirm(&instructions, buyer, &[buyer])
            .await?;

        let account = self.base.fetch_sale_account(&sale_account).await?;
        check_account_data(&account, &expected)?;

        Ok(AirdropOutcome {
            signature,
            buyer_token_account: accounts.buyer_token_account,
            before,
            account,
        })
    }

    /// Token balances followed by SOL balances, in the order given
    pub async fn balance_report(
        &self,
        token_accounts: &[(&str, Pubkey)],
        wallets: &[(&str, Pubkey)],
    ) -> SdkResult<BalanceReport> {
        let mut report = BalanceReport::default();
        for (label, address) in token_accounts {
            let amount = self.base.get_token_balance(address).await?;
            report.push(BalanceRow::tokens(*label, *address, amount));
        }
        for (label, address) in wallets {
            let lamports = self.base.get_balance(address).await?;
            report.push(BalanceRow::lamports(*label, *address, lamports));
        }
        Ok(report)
    }
}

use std::sync::Arc;

use log::{debug, info};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tokio::time::{sleep, Instant};
use token_sale_types::TokenSaleAccount;

use crate::{
    config::SdkConfig,
    error::{SdkError, SdkResult},
};

/// Base RPC client wrapper for common operations
pub struct BaseClient {
    rpc: Arc<RpcClient>,
    config: SdkConfig,
}

impl BaseClient {
    pub fn new(config: SdkConfig) -> Self {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            config.commitment_config(),
        ));
        Self { rpc, config }
    }

    pub fn with_rpc(rpc: Arc<RpcClient>, config: SdkConfig) -> Self {
        Self { rpc, config }
    }

    /// Get the RPC client
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Get the RPC endpoint URL
    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }

    /// Fetch an account that must exist and hold data
    pub async fn get_account(&self, address: &Pubkey) -> SdkResult<Account> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.config.commitment_config())
            .await?
            .value;

        match account {
            Some(account) if !account.data.is_empty() => Ok(account),
            _ => Err(SdkError::AccountNotFound(*address)),
        }
    }

    /// Fetch and decode a sale account
    pub async fn fetch_sale_account(&self, address: &Pubkey) -> SdkResult<TokenSaleAccount> {
        let account = self.get_account(address).await?;
        debug!(
            "Sale account {} holds {} bytes, owner {}",
            address,
            account.data.len(),
            account.owner
        );
        Ok(TokenSaleAccount::unpack(&account.data)?)
    }

    pub async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> SdkResult<u64> {
        Ok(self.rpc.get_minimum_balance_for_rent_exemption(space).await?)
    }

    /// Get account balance in lamports
    pub async fn get_balance(&self, pubkey: &Pubkey) -> SdkResult<u64> {
        Ok(self.rpc.get_balance(pubkey).await?)
    }

    /// Get a token account balance in base units
    pub async fn get_token_balance(&self, token_account: &Pubkey) -> SdkResult<String> {
        let balance = self.rpc.get_token_account_balance(token_account).await?;
        Ok(balance.amount)
    }

    /// Sign, send and wait for a transaction
    ///
    /// `payer` pays fees and must also appear in `signers`. A rejected send is
    /// reported as [`SdkError::Submission`]; a send that is never observed at
    /// the configured commitment is reported as [`SdkError::ConfirmationTimeout`].
    pub async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> SdkResult<Signature> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            signers,
            recent_blockhash,
        );

        let signature = self
            .rpc
            .send_transaction(&tx)
            .await
            .map_err(SdkError::Submission)?;
        info!("Sent transaction {}", signature);

        self.confirm(&signature).await?;
        Ok(signature)
    }

    /// Poll a signature until it reaches the configured commitment
    pub async fn confirm(&self, signature: &Signature) -> SdkResult<()> {
        let deadline = Instant::now() + self.config.confirm_timeout;

        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, self.config.commitment_config())
                .await?;

            match status {
                Some(Ok(())) => {
                    info!("Confirmed transaction {}", signature);
                    return Ok(());
                }
                Some(Err(err)) => {
                    return Err(SdkError::TransactionFailed {
                        signature: *signature,
                        reason: err.to_string(),
                    });
                }
                None => {}
            }

            if Instant::now() >= deadline {
                return Err(SdkError::ConfirmationTimeout {
                    signature: *signature,
                    timeout: self.config.confirm_timeout,
                });
            }
            sleep(self.config.poll_interval).await;
        }
    }
}

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction, sysvar};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::solana_program::program_pack::Pack;
use token_sale_types::{
    TokenSaleAccount, TokenSaleInstruction, DEFAULT_INCREASE_TOKEN_PRICE,
    DEFAULT_MAX_TOKEN_PRICE, DEFAULT_PHASE_DELAY_TIME, DEFAULT_PRICE_PER_TOKEN,
    DEFAULT_SALE_TOKEN_AMOUNT, TOKEN_SALE_ACCOUNT_LEN,
};

use crate::{
    error::{SdkError, SdkResult},
    instructions::SaleInstructionBuilder,
    protocol::find_sale_authority_address,
};

/// Space of an SPL token account
pub const TOKEN_ACCOUNT_LEN: usize = spl_token::state::Account::LEN;

/// Parameters for starting a sale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartSaleParams {
    /// Tokens moved from the seller into escrow
    pub sale_token_amount: u64,
    /// Starting price in lamports
    pub price_per_token: u64,
    /// Price ceiling in lamports
    pub max_token_price: u64,
    /// Price increase per phase in lamports
    pub increase_token_price: u64,
    /// Phase length in seconds
    pub phase_delay_time: u64,
}

impl Default for StartSaleParams {
    fn default() -> Self {
        Self {
            sale_token_amount: DEFAULT_SALE_TOKEN_AMOUNT,
            price_per_token: DEFAULT_PRICE_PER_TOKEN,
            max_token_price: DEFAULT_MAX_TOKEN_PRICE,
            increase_token_price: DEFAULT_INCREASE_TOKEN_PRICE,
            phase_delay_time: DEFAULT_PHASE_DELAY_TIME,
        }
    }
}

impl StartSaleParams {
    pub fn validate(&self) -> SdkResult<()> {
        if self.sale_token_amount == 0 {
            return Err(SdkError::InvalidParameters(
                "sale token amount must be greater than 0".to_string(),
            ));
        }
        if self.price_per_token > self.max_token_price {
            return Err(SdkError::InvalidParameters(format!(
                "price per token {} exceeds max token price {}",
                self.price_per_token, self.max_token_price
            )));
        }
        if self.phase_delay_time == 0 {
            return Err(SdkError::InvalidParameters(
                "phase delay time must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn instruction(&self) -> TokenSaleInstruction {
        TokenSaleInstruction::StartSale {
            price_per_token: self.price_per_token,
            max_token_price: self.max_token_price,
            increase_token_price: self.increase_token_price,
            phase_delay_time: self.phase_delay_time,
        }
    }

    /// Sale record expected right after the start-sale transaction
    pub fn expected_account(&self, seller: Pubkey, temp_token_account: Pubkey) -> TokenSaleAccount {
        TokenSaleAccount {
            is_initialized: true,
            seller_pubkey: seller,
            temp_token_account_pubkey: temp_token_account,
            price_per_token: self.price_per_token,
            max_token_price: self.max_token_price,
            increase_token_price: self.increase_token_price,
            purchased_token_amount: 0,
            phase_start_time: 0,
            phase_delay_time: self.phase_delay_time,
        }
    }
}

/// Accounts touched by the start-sale transaction
#[derive(Clone, Copy, Debug)]
pub struct StartSaleAccounts {
    /// Seller, fee payer and escrow funder
    pub seller: Pubkey,
    /// Seller's token account the sale amount is drawn from
    pub seller_token_account: Pubkey,
    pub token_mint: Pubkey,
    /// Fresh account that becomes the escrow
    pub temp_token_account: Pubkey,
    /// Fresh account that becomes the sale state
    pub sale_account: Pubkey,
}

/// Rent-exempt balances for the accounts created by start-sale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RentExemption {
    pub token_account_lamports: u64,
    pub sale_account_lamports: u64,
}

/// Accounts touched by the airdrop instruction
#[derive(Clone, Copy, Debug)]
pub struct AirdropAccounts {
    /// Recipient and signer
    pub buyer: Pubkey,
    /// Seller recorded in the sale account
    pub seller: Pubkey,
    /// Escrow recorded in the sale account
    pub temp_token_account: Pubkey,
    pub sale_account: Pubkey,
    /// Buyer's associated token account for the sale mint
    pub buyer_token_account: Pubkey,
}

/// Token sale instruction builder
pub struct TokenSaleInstructionBuilder {
    program_id: Pubkey,
}

impl TokenSaleInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Build the program's start-sale instruction
    pub fn start_sale(
        &self,
        seller: Pubkey,
        temp_token_account: Pubkey,
        sale_account: Pubkey,
        params: &StartSaleParams,
    ) -> Instruction {
        SaleInstructionBuilder::with_program_id(self.program_id)
            .add_readonly_signer(seller)
            .add_writable(temp_token_account)
            .add_writable(sale_account)
            .add_readonly(sysvar::rent::id())
            .add_readonly(spl_token::id())
            .with_data(params.instruction().pack())
            .build()
    }

    /// Build the program's airdrop instruction
    pub fn airdrop(&self, accounts: &AirdropAccounts, token_amount: u64) -> Instruction {
        let (sale_authority, _) = find_sale_authority_address(&self.program_id);

        SaleInstructionBuilder::with_program_id(self.program_id)
            .add_signer(accounts.buyer)
            .add_writable(accounts.seller)
            .add_writable(accounts.temp_token_account)
            .add_writable(accounts.sale_account)
            .add_writable(accounts.buyer_token_account)
            .add_readonly(spl_token::id())
            .add_readonly(sale_authority)
            .with_data(TokenSaleInstruction::Airdrop { token_amount }.pack())
            .build()
    }

    /// Every instruction of the start-sale transaction, in execution order
    ///
    /// Creates and funds the escrow token account, creates the sale account,
    /// then hands both to the program.
    pub fn start_sale_transaction(
        &self,
        accounts: &StartSaleAccounts,
        params: &StartSaleParams,
        rent: &RentExemption,
    ) -> SdkResult<Vec<Instruction>> {
        params.validate()?;

        let create_temp_token_account = system_instruction::create_account(
            &accounts.seller,
            &accounts.temp_token_account,
            rent.token_account_lamports,
            TOKEN_ACCOUNT_LEN as u64,
            &spl_token::id(),
        );

        let init_temp_token_account = spl_token::instruction::initialize_account(
            &spl_token::id(),
            &accounts.temp_token_account,
            &accounts.token_mint,
            &accounts.seller,
        )?;

        let transfer_to_temp_token_account = spl_token::instruction::transfer(
            &spl_token::id(),
            &accounts.seller_token_account,
            &accounts.temp_token_account,
            &accounts.seller,
            &[],
            params.sale_token_amount,
        )?;

        let create_sale_account = system_instruction::create_account(
            &accounts.seller,
            &accounts.sale_account,
            rent.sale_account_lamports,
            TOKEN_SALE_ACCOUNT_LEN as u64,
            &self.program_id,
        );

        let start_sale = self.start_sale(
            accounts.seller,
            accounts.temp_token_account,
            accounts.sale_account,
            params,
        );

        Ok(vec![
            create_temp_token_account,
            init_temp_token_account,
            transfer_to_temp_token_account,
            create_sale_account,
            start_sale,
        ])
    }

    /// Every instruction of the airdrop transaction, in execution order
    ///
    /// The buyer's associated token account is created first when missing.
    pub fn airdrop_transaction(
        &self,
        accounts: &AirdropAccounts,
        token_mint: &Pubkey,
        token_amount: u64,
    ) -> SdkResult<Vec<Instruction>> {
        if token_amount == 0 {
            return Err(SdkError::InvalidParameters(
                "airdrop amount must be greater than 0".to_string(),
            ));
        }

        let create_buyer_token_account = create_associated_token_account_idempotent(
            &accounts.buyer,
            &accounts.buyer,
            token_mint,
            &spl_token::id(),
        );

        Ok(vec![
            create_buyer_token_account,
            self.airdrop(accounts, token_amount),
        ])
    }
}

/// Associated token account of a wallet for the sale mint
pub fn buyer_token_account(buyer: &Pubkey, token_mint: &Pubkey) -> Pubkey {
    get_associated_token_address(buyer, token_mint)
}

/// Token Sale SDK
///
/// Client-side tooling for a token sale program on Solana.
/// Provides:
/// - Instruction builders for starting a sale and airdropping tokens
/// - An RPC client that submits, confirms and validates sale transactions
/// - A file-backed store for identities shared between commands
/// - Balance reports

pub mod client;
pub mod config;
pub mod env_store;
pub mod error;
pub mod instructions;
pub mod protocol;
pub mod report;

pub use client::{
    expected_after_airdrop, AirdropOutcome, BaseClient, SaleClient, StartSaleOutcome,
};
pub use config::*;
pub use env_store::{keypair_from_base58, EnvStore};
pub use error::*;
pub use instructions::*;
pub use protocol::*;
pub use report::*;

// Re-export the shared codec crate
pub use token_sale_types;
pub use token_sale_types::{
    check_account_data, AccountField, FieldMismatch, Opcode, TokenSaleAccount,
    TokenSaleInstruction, TOKEN_SALE_ACCOUNT_LEN,
};

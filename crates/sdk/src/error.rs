//! SDK error types

use std::time::Duration;

use solana_client::client_error::ClientError;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;
use token_sale_types::{FieldMismatch, TokenSaleError};

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// RPC request failed before or after the transaction
    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    /// Cluster rejected the transaction when it was sent
    #[error("Transaction submission failed: {0}")]
    Submission(#[source] ClientError),

    /// Transaction was sent but no confirmation arrived in time
    #[error("Transaction {signature} not confirmed within {}s", .timeout.as_secs())]
    ConfirmationTimeout {
        signature: Signature,
        timeout: Duration,
    },

    /// Transaction landed and executed with an error
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: Signature, reason: String },

    /// Account is missing or holds no data
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Codec failure on sale data
    #[error(transparent)]
    TokenSale(TokenSaleError),

    /// Refetched sale account differs from the expected record
    #[error("Sale account validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldMismatch>),

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    pub fn config(message: impl Into<String>) -> Self {
        SdkError::Config(message.into())
    }

    /// True when the failure came from comparing on-chain state
    pub fn is_validation(&self) -> bool {
        matches!(self, SdkError::Validation(_))
    }

    /// Field mismatches carried by a validation failure
    pub fn mismatches(&self) -> &[FieldMismatch] {
        match self {
            SdkError::Validation(mismatches) => mismatches,
            _ => &[],
        }
    }
}

impl From<TokenSaleError> for SdkError {
    fn from(err: TokenSaleError) -> Self {
        match err {
            TokenSaleError::AccountMismatch(mismatches) => SdkError::Validation(mismatches),
            other => SdkError::TokenSale(other),
        }
    }
}

impl From<solana_sdk::program_error::ProgramError> for SdkError {
    fn from(err: solana_sdk::program_error::ProgramError) -> Self {
        SdkError::InvalidParameters(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

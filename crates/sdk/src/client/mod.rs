pub mod base;
pub mod sale;

pub use base::BaseClient;
pub use sale::{expected_after_airdrop, AirdropOutcome, SaleClient, StartSaleOutcome};

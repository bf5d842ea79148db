// Command modules for the token sale CLI

pub mod airdrop;
pub mod show;
pub mod start_sale;
pub mod utils;

use token_sale_sdk::{EnvStore, SdkConfig};

/// State shared by every command
pub struct CommandContext {
    pub env: EnvStore,
    pub config: SdkConfig,
}

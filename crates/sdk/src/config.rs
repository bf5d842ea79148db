use std::{str::FromStr, time::Duration};

use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};

use crate::error::{SdkError, SdkResult};

/// Public devnet endpoint, the cluster the sale scripts target by default
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default time to wait for a submitted transaction to confirm
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// SDK configuration for connecting to a cluster
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Commitment used for confirmation and all reads
    pub commitment: CommitmentLevel,

    /// How long to wait for a sent transaction before giving up
    pub confirm_timeout: Duration,

    /// Interval between signature status checks
    pub poll_interval: Duration,
}

impl SdkConfig {
    pub fn localnet() -> Self {
        Self::with_url("http://localhost:8899")
    }

    pub fn devnet() -> Self {
        Self::with_url(DEVNET_RPC_URL)
    }

    pub fn mainnet() -> Self {
        Self::with_url("https://api.mainnet-beta.solana.com")
    }

    fn with_url(url: &str) -> Self {
        Self {
            rpc_url: url.to_string(),
            commitment: CommitmentLevel::Confirmed,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

/// Parse `processed`, `confirmed` or `finalized`
pub fn parse_commitment(value: &str) -> SdkResult<CommitmentLevel> {
    CommitmentLevel::from_str(value).map_err(|_| {
        SdkError::config(format!(
            "unsupported commitment '{}', use processed, confirmed or finalized",
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_share_defaults() {
        let config = SdkConfig::localnet();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
        assert_eq!(config.confirm_timeout, DEFAULT_CONFIRM_TIMEOUT);
        assert_eq!(SdkConfig::default().rpc_url, DEVNET_RPC_URL);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SdkConfig::devnet()
            .with_rpc_url("http://127.0.0.1:8899")
            .with_commitment(CommitmentLevel::Finalized)
            .with_confirm_timeout(Duration::from_secs(5));

        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.commitment_config(), CommitmentConfig::finalized());
        assert_eq!(config.confirm_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_commitment() {
        assert_eq!(parse_commitment("confirmed").unwrap(), CommitmentLevel::Confirmed);
        assert_eq!(parse_commitment("finalized").unwrap(), CommitmentLevel::Finalized);
        assert!(parse_commitment("eventually").is_err());
    }
}

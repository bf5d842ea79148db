/// Constants shared by the sale account layout, the instruction builders and the CLI

use solana_program::native_token::LAMPORTS_PER_SOL;

// ============================================================================
// Layout Constants
// ============================================================================

/// Size of the sale state account in bytes
pub const TOKEN_SALE_ACCOUNT_LEN: usize = 113;

/// Width of a public key field
pub const PUBKEY_LEN: usize = 32;

/// Width of every integer field and instruction argument
pub const U64_LEN: usize = 8;

/// Width of the opcode prefix on instruction payloads
pub const OPCODE_LEN: usize = 1;

// ============================================================================
// Program Constants
// ============================================================================

/// Seed of the program-derived address that owns the escrowed tokens
pub const TOKEN_SALE_PDA_SEED: &[u8] = b"token_sale";

// ============================================================================
// Default Sale Parameters
// ============================================================================

/// Tokens moved into the escrow account when a sale starts
pub const DEFAULT_SALE_TOKEN_AMOUNT: u64 = 1_000;

/// 0.0075 SOL
pub const DEFAULT_PRICE_PER_TOKEN: u64 = LAMPORTS_PER_SOL * 75 / 10_000;

/// 0.01 SOL
pub const DEFAULT_MAX_TOKEN_PRICE: u64 = LAMPORTS_PER_SOL / 100;

/// 0.0005 SOL
pub const DEFAULT_INCREASE_TOKEN_PRICE: u64 = LAMPORTS_PER_SOL * 5 / 10_000;

/// 21 days
pub const DEFAULT_PHASE_DELAY_TIME: u64 = 3_600 * 24 * 21;

/// Tokens sent to the buyer by one airdrop
pub const DEFAULT_AIRDROP_TOKEN_AMOUNT: u64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sale_parameters_in_lamports() {
        assert_eq!(DEFAULT_PRICE_PER_TOKEN, 7_500_000);
        assert_eq!(DEFAULT_MAX_TOKEN_PRICE, 10_000_000);
        assert_eq!(DEFAULT_INCREASE_TOKEN_PRICE, 500_000);
        assert_eq!(DEFAULT_PHASE_DELAY_TIME, 1_814_400);
    }

    #[test]
    fn test_layout_width_adds_up() {
        assert_eq!(TOKEN_SALE_ACCOUNT_LEN, 1 + 2 * PUBKEY_LEN + 6 * U64_LEN);
    }
}

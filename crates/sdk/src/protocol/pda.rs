use log::debug;
use solana_sdk::pubkey::Pubkey;
use token_sale_types::TOKEN_SALE_PDA_SEED;

/// Program-derived address that holds authority over the escrowed tokens
///
/// The program moves the escrow account's ownership to this address when the
/// sale starts and signs token transfers out of it with the same seed.
pub fn find_sale_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    let (address, bump) = Pubkey::find_program_address(&[TOKEN_SALE_PDA_SEED], program_id);
    debug!("Sale authority for {}: {} (bump {})", program_id, address, bump);
    (address, bump)
}

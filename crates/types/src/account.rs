//! Fixed-width layout of the sale state account
//!
//! The record is 113 bytes with no padding, no length prefixes and no version
//! field. [`ACCOUNT_LAYOUT`] names every field's offset for display and
//! validation; the codec itself splits the record with `arrayref`.

use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::{
    constants::{PUBKEY_LEN, TOKEN_SALE_ACCOUNT_LEN, U64_LEN},
    errors::TokenSaleError,
    TokenSaleResult,
};

// ============================================================================
// Layout Table
// ============================================================================

/// Fields of the sale account in on-chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    IsInitialized,
    SellerPubkey,
    TempTokenAccountPubkey,
    PricePerToken,
    MaxTokenPrice,
    IncreaseTokenPrice,
    PurchasedTokenAmount,
    PhaseStartTime,
    PhaseDelayTime,
}

impl AccountField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsInitialized => "is_initialized",
            Self::SellerPubkey => "seller_pubkey",
            Self::TempTokenAccountPubkey => "temp_token_account_pubkey",
            Self::PricePerToken => "price_per_token",
            Self::MaxTokenPrice => "max_token_price",
            Self::IncreaseTokenPrice => "increase_token_price",
            Self::PurchasedTokenAmount => "purchased_token_amount",
            Self::PhaseStartTime => "phase_start_time",
            Self::PhaseDelayTime => "phase_delay_time",
        }
    }
}

/// Position of one field inside the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub field: AccountField,
    pub offset: usize,
    pub width: usize,
}

impl FieldSpan {
    const fn new(field: AccountField, offset: usize, width: usize) -> Self {
        Self { field, offset, width }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// Byte layout of the sale account
pub const ACCOUNT_LAYOUT: [FieldSpan; 9] = [
    FieldSpan::new(AccountField::IsInitialized, 0, 1),
    FieldSpan::new(AccountField::SellerPubkey, 1, PUBKEY_LEN),
    FieldSpan::new(AccountField::TempTokenAccountPubkey, 33, PUBKEY_LEN),
    FieldSpan::new(AccountField::PricePerToken, 65, U64_LEN),
    FieldSpan::new(AccountField::MaxTokenPrice, 73, U64_LEN),
    FieldSpan::new(AccountField::IncreaseTokenPrice, 81, U64_LEN),
    FieldSpan::new(AccountField::PurchasedTokenAmount, 89, U64_LEN),
    FieldSpan::new(AccountField::PhaseStartTime, 97, U64_LEN),
    FieldSpan::new(AccountField::PhaseDelayTime, 105, U64_LEN),
];

/// Look up the span of a field
pub fn field_span(field: AccountField) -> FieldSpan {
    ACCOUNT_LAYOUT[field as usize]
}

// ============================================================================
// Sale Account Record
// ============================================================================

/// Decoded sale state account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSaleAccount {
    /// Whether the program has started the sale
    pub is_initialized: bool,
    /// Identity that started the sale and receives payments
    pub seller_pubkey: Pubkey,
    /// Escrow token account holding the tokens for sale
    pub temp_token_account_pubkey: Pubkey,
    /// Current price in lamports
    pub price_per_token: u64,
    /// Ceiling the price never rises above
    pub max_token_price: u64,
    /// Price step applied per elapsed phase
    pub increase_token_price: u64,
    /// Cumulative units sold or airdropped
    pub purchased_token_amount: u64,
    /// Unix timestamp the current phase began
    pub phase_start_time: u64,
    /// Seconds per phase
    pub phase_delay_time: u64,
}

impl Sealed for TokenSaleAccount {}

impl IsInitialized for TokenSaleAccount {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for TokenSaleAccount {
    const LEN: usize = TOKEN_SALE_ACCOUNT_LEN;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        if src.len() < Self::LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        Self::decode(array_ref![src, 0, TOKEN_SALE_ACCOUNT_LEN])
            .map_err(|_| ProgramError::InvalidAccountData)
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, TOKEN_SALE_ACCOUNT_LEN];
        let (
            is_initialized_dst,
            seller_pubkey_dst,
            temp_token_account_pubkey_dst,
            price_per_token_dst,
            max_token_price_dst,
            increase_token_price_dst,
            purchased_token_amount_dst,
            phase_start_time_dst,
            phase_delay_time_dst,
        ) = mut_array_refs![dst, 1, 32, 32, 8, 8, 8, 8, 8, 8];

        is_initialized_dst[0] = self.is_initialized as u8;
        seller_pubkey_dst.copy_from_slice(self.seller_pubkey.as_ref());
        temp_token_account_pubkey_dst.copy_from_slice(self.temp_token_account_pubkey.as_ref());
        *price_per_token_dst = self.price_per_token.to_le_bytes();
        *max_token_price_dst = self.max_token_price.to_le_bytes();
        *increase_token_price_dst = self.increase_token_price.to_le_bytes();
        *purchased_token_amount_dst = self.purchased_token_amount.to_le_bytes();
        *phase_start_time_dst = self.phase_start_time.to_le_bytes();
        *phase_delay_time_dst = self.phase_delay_time.to_le_bytes();
    }
}

impl TokenSaleAccount {
    /// Decode the first 113 bytes of an account buffer
    ///
    /// Unlike [`Pack::unpack`], an uninitialized record decodes successfully
    /// and failures carry the offending length or flag byte.
    pub fn unpack(src: &[u8]) -> TokenSaleResult<Self> {
        if src.len() < TOKEN_SALE_ACCOUNT_LEN {
            return Err(TokenSaleError::too_short(TOKEN_SALE_ACCOUNT_LEN, src.len()));
        }
        Self::decode(array_ref![src, 0, TOKEN_SALE_ACCOUNT_LEN])
    }

    /// Encode into a slice of exactly 113 bytes
    pub fn pack_into(&self, dst: &mut [u8]) -> TokenSaleResult<()> {
        if dst.len() != TOKEN_SALE_ACCOUNT_LEN {
            return Err(TokenSaleError::InvalidDestinationLength {
                expected: TOKEN_SALE_ACCOUNT_LEN,
                actual: dst.len(),
            });
        }
        Pack::pack_into_slice(self, dst);
        Ok(())
    }

    /// Encode into a fresh 113-byte array
    pub fn to_bytes(&self) -> [u8; TOKEN_SALE_ACCOUNT_LEN] {
        let mut dst = [0u8; TOKEN_SALE_ACCOUNT_LEN];
        Pack::pack_into_slice(self, &mut dst);
        dst
    }

    fn decode(src: &[u8; TOKEN_SALE_ACCOUNT_LEN]) -> TokenSaleResult<Self> {
        let (
            is_initialized,
            seller_pubkey,
            temp_token_account_pubkey,
            price_per_token,
            max_token_price,
            increase_token_price,
            purchased_token_amount,
            phase_start_time,
            phase_delay_time,
        ) = array_refs![src, 1, 32, 32, 8, 8, 8, 8, 8, 8];

        let is_initialized = match is_initialized {
            [0] => false,
            [1] => true,
            [other] => return Err(TokenSaleError::InvalidInitializedFlag(*other)),
        };

        Ok(Self {
            is_initialized,
            seller_pubkey: Pubkey::new_from_array(*seller_pubkey),
            temp_token_account_pubkey: Pubkey::new_from_array(*temp_token_account_pubkey),
            price_per_token: u64::from_le_bytes(*price_per_token),
            max_token_price: u64::from_le_bytes(*max_token_price),
            increase_token_price: u64::from_le_bytes(*increase_token_price),
            purchased_token_amount: u64::from_le_bytes(*purchased_token_amount),
            phase_start_time: u64::from_le_bytes(*phase_start_time),
            phase_delay_time: u64::from_le_bytes(*phase_delay_time),
        })
    }

    /// Display value of one field, keys in base58 and integers in decimal
    pub fn field_value(&self, field: AccountField) -> String {
        match field {
            AccountField::IsInitialized => (self.is_initialized as u8).to_string(),
            AccountField::SellerPubkey => self.seller_pubkey.to_string(),
            AccountField::TempTokenAccountPubkey => self.temp_token_account_pubkey.to_string(),
            AccountField::PricePerToken => self.price_per_token.to_string(),
            AccountField::MaxTokenPrice => self.max_token_price.to_string(),
            AccountField::IncreaseTokenPrice => self.increase_token_price.to_string(),
            AccountField::PurchasedTokenAmount => self.purchased_token_amount.to_string(),
            AccountField::PhaseStartTime => self.phase_start_time.to_string(),
            AccountField::PhaseDelayTime => self.phase_delay_time.to_string(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_record()(
            flag in 0u8..=1,
            body in prop::collection::vec(any::<u8>(), TOKEN_SALE_ACCOUNT_LEN - 1)
        ) -> [u8; TOKEN_SALE_ACCOUNT_LEN] {
            let mut raw = [0u8; TOKEN_SALE_ACCOUNT_LEN];
            raw[0] = flag;
            raw[1..].copy_from_slice(&body);
            raw
        }
    }

    proptest! {
        #[test]
        fn decode_then_encode_reproduces_bytes(raw in valid_record()) {
            let decoded = TokenSaleAccount::unpack(&raw).unwrap();
            prop_assert_eq!(decoded.to_bytes(), raw);
        }

        #[test]
        fn short_buffers_are_rejected(
            raw in prop::collection::vec(any::<u8>(), 0..TOKEN_SALE_ACCOUNT_LEN)
        ) {
            prop_assert_eq!(
                TokenSaleAccount::unpack(&raw),
                Err(TokenSaleError::AccountDataTooShort {
                    expected: TOKEN_SALE_ACCOUNT_LEN,
                    actual: raw.len(),
                })
            );
        }
    }
}

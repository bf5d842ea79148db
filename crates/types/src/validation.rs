//! Post-transaction check of decoded sale state

use log::debug;

use crate::{
    account::{AccountField, TokenSaleAccount, ACCOUNT_LAYOUT},
    errors::{FieldMismatch, TokenSaleError},
    TokenSaleResult,
};

/// List every field that differs between two records
pub fn diff_accounts(actual: &TokenSaleAccount, expected: &TokenSaleAccount) -> Vec<FieldMismatch> {
    ACCOUNT_LAYOUT
        .iter()
        .map(|span| span.field)
        .filter(|&field| !field_matches(actual, expected, field))
        .map(|field| FieldMismatch {
            field: field.name(),
            expected: expected.field_value(field),
            actual: actual.field_value(field),
        })
        .collect()
}

/// Compare decoded on-chain state with the expected record
///
/// Succeeds silently when every field is equal. Otherwise returns
/// [`TokenSaleError::AccountMismatch`] naming each differing field with its
/// expected and actual value.
pub fn check_account_data(
    actual: &TokenSaleAccount,
    expected: &TokenSaleAccount,
) -> TokenSaleResult<()> {
    for span in ACCOUNT_LAYOUT.iter() {
        debug!(
            "{}: {} (expected {})",
            span.field.name(),
            actual.field_value(span.field),
            expected.field_value(span.field)
        );
    }

    let mismatches = diff_accounts(actual, expected);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(TokenSaleError::AccountMismatch(mismatches))
    }
}

fn field_matches(actual: &TokenSaleAccount, expected: &TokenSaleAccount, field: AccountField) -> bool {
    match field {
        AccountField::IsInitialized => actual.is_initialized == expected.is_initialized,
        AccountField::SellerPubkey => actual.seller_pubkey == expected.seller_pubkey,
        AccountField::TempTokenAccountPubkey => {
            actual.temp_token_account_pubkey == expected.temp_token_account_pubkey
        }
        AccountField::PricePerToken => actual.price_per_token == expected.price_per_token,
        AccountField::MaxTokenPrice => actual.max_token_price == expected.max_token_price,
        AccountField::IncreaseTokenPrice => {
            actual.increase_token_price == expected.increase_token_price
        }
        AccountField::PurchasedTokenAmount => {
            actual.purchased_token_amount == expected.purchased_token_amount
        }
        AccountField::PhaseStartTime => actual.phase_start_time == expected.phase_start_time,
        AccountField::PhaseDelayTime => actual.phase_delay_time == expected.phase_delay_time,
    }
}

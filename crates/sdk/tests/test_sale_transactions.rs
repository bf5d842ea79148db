//! Transaction layout tests for start-sale and airdrop

use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;
use token_sale_sdk::{
    buyer_token_account, check_account_data, expected_after_airdrop, find_sale_authority_address,
    AirdropAccounts, RentExemption, StartSaleAccounts, StartSaleParams, TokenSaleAccount,
    TokenSaleInstruction, TokenSaleInstructionBuilder, TOKEN_ACCOUNT_LEN, TOKEN_SALE_ACCOUNT_LEN,
};

fn flags(ix: &Instruction) -> Vec<(Pubkey, bool, bool)> {
    ix.accounts
        .iter()
        .map(|meta| (meta.pubkey, meta.is_signer, meta.is_writable))
        .collect()
}

fn start_sale_accounts() -> StartSaleAccounts {
    StartSaleAccounts {
        seller: Pubkey::new_unique(),
        seller_token_account: Pubkey::new_unique(),
        token_mint: Pubkey::new_unique(),
        temp_token_account: Pubkey::new_unique(),
        sale_account: Pubkey::new_unique(),
    }
}

const RENT: RentExemption = RentExemption {
    token_account_lamports: 2_039_280,
    sale_account_lamports: 1_677_360,
};

#[test]
fn test_start_sale_transaction_order() -> Result<()> {
    let program_id = Pubkey::new_unique();
    let builder = TokenSaleInstructionBuilder::new(program_id);
    let accounts = start_sale_accounts();
    let params = StartSaleParams::default();

    let ixs = builder.start_sale_transaction(&accounts, &params, &RENT)?;
    assert_eq!(ixs.len(), 5);

    let owners: Vec<Pubkey> = ixs.iter().map(|ix| ix.program_id).collect();
    assert_eq!(
        owners,
        vec![
            system_program::id(),
            spl_token::id(),
            spl_token::id(),
            system_program::id(),
            program_id,
        ]
    );

    // Escrow account creation is funded by the seller
    assert_eq!(ixs[0].accounts[0].pubkey, accounts.seller);
    assert_eq!(ixs[0].accounts[1].pubkey, accounts.temp_token_account);
    assert_eq!(ixs[3].accounts[1].pubkey, accounts.sale_account);
    assert_eq!(TOKEN_ACCOUNT_LEN, 165);

    Ok(())
}

#[test]
fn test_start_sale_instruction_accounts_and_data() -> Result<()> {
    let program_id = Pubkey::new_unique();
    let builder = TokenSaleInstructionBuilder::new(program_id);
    let accounts = start_sale_accounts();
    let params = StartSaleParams::default();

    let ixs = builder.start_sale_transaction(&accounts, &params, &RENT)?;
    let start = &ixs[4];

    assert_eq!(
        flags(start),
        vec![
            (accounts.seller, true, false),
            (accounts.temp_token_account, false, true),
            (accounts.sale_account, false, true),
            (sysvar::rent::id(), false, false),
            (spl_token::id(), false, false),
        ]
    );

    assert_eq!(start.data.len(), 33);
    assert_eq!(start.data[0], 0);
    assert_eq!(&start.data[1..9], &7_500_000u64.to_le_bytes());
    assert_eq!(&start.data[9..17], &10_000_000u64.to_le_bytes());
    assert_eq!(&start.data[17..25], &500_000u64.to_le_bytes());
    assert_eq!(&start.data[25..33], &1_814_400u64.to_le_bytes());
    assert_eq!(
        TokenSaleInstruction::unpack(&start.data)?,
        params.instruction()
    );

    Ok(())
}

#[test]
fn test_airdrop_transaction_accounts_and_data() -> Result<()> {
    let program_id = Pubkey::new_unique();
    let builder = TokenSaleInstructionBuilder::new(program_id);
    let mint = Pubkey::new_unique();
    let buyer = Pubkey::new_unique();
    let accounts = AirdropAccounts {
        buyer,
        seller: Pubkey::new_unique(),
        temp_token_account: Pubkey::new_unique(),
        sale_account: Pubkey::new_unique(),
        buyer_token_account: buyer_token_account(&buyer, &mint),
    };

    let ixs = builder.airdrop_transaction(&accounts, &mint, 10)?;
    assert_eq!(ixs.len(), 2);
    assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
    assert_eq!(
        accounts.buyer_token_account,
        get_associated_token_address(&buyer, &mint)
    );

    let airdrop = &ixs[1];
    let (sale_authority, _) = find_sale_authority_address(&program_id);
    assert_eq!(airdrop.program_id, program_id);
    assert_eq!(
        flags(airdrop),
        vec![
            (buyer, true, true),
            (accounts.seller, false, true),
            (accounts.temp_token_account, false, true),
            (accounts.sale_account, false, true),
            (accounts.buyer_token_account, false, true),
            (spl_token::id(), false, false),
            (sale_authority, false, false),
        ]
    );

    let mut expected_data = vec![2u8];
    expected_data.extend_from_slice(&10u64.to_le_bytes());
    assert_eq!(airdrop.data, expected_data);

    Ok(())
}

#[test]
fn test_sale_record_through_both_commands() -> Result<()> {
    // A freshly created sale account is all zeroes
    let created = TokenSaleAccount::unpack(&[0u8; TOKEN_SALE_ACCOUNT_LEN])?;
    assert!(!created.is_initialized);

    let seller = Pubkey::new_unique();
    let temp = Pubkey::new_unique();
    let params = StartSaleParams::default();
    let expected = params.expected_account(seller, temp);

    // What the program writes after start-sale
    let started = TokenSaleAccount {
        is_initialized: true,
        seller_pubkey: seller,
        temp_token_account_pubkey: temp,
        price_per_token: params.price_per_token,
        max_token_price: params.max_token_price,
        increase_token_price: params.increase_token_price,
        phase_delay_time: params.phase_delay_time,
        ..created
    }
    .to_bytes();
    let started = TokenSaleAccount::unpack(&started)?;
    check_account_data(&started, &expected)?;
    assert!(check_account_data(&created, &expected).is_err());

    let after_airdrop = expected_after_airdrop(&started, 10)?;
    let on_chain = TokenSaleAccount {
        purchased_token_amount: 10,
        ..started
    };
    check_account_data(&on_chain, &after_airdrop)?;

    let err = check_account_data(&started, &after_airdrop).unwrap_err();
    assert_eq!(err.mismatched_fields(), vec!["purchased_token_amount"]);

    Ok(())
}

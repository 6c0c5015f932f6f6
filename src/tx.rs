//! Assembles the atomic buy transaction: idempotent ATA creation, a
//! compute-unit price bid, then the buy itself, compiled into one signed
//! v0 message.

use anyhow::Result;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_program, sysvar,
    transaction::VersionedTransaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use crate::accounts::DerivedAccounts;
use crate::codec::encode_buy_data;
use crate::constants::{PUMP_EVENT_AUTHORITY, PUMP_FEE, PUMP_GLOBAL, PUMP_PROGRAM};
use crate::trade::TradeSize;

/// The buy instruction. The program indexes its accounts positionally, so
/// the meta order here is load-bearing: global config, fee recipient, mint,
/// bonding curve, associated bonding curve, buyer ATA, buyer, system
/// program, token program, rent sysvar, event authority, pump program.
pub fn buy_instruction(
    payer: &Pubkey,
    payer_ata: &Pubkey,
    mint: &Pubkey,
    derived: &DerivedAccounts,
    size: TradeSize,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(PUMP_GLOBAL, false),
        AccountMeta::new(PUMP_FEE, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(derived.bonding_curve, false),
        AccountMeta::new(derived.associated_bonding_curve, false),
        AccountMeta::new(*payer_ata, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(PUMP_EVENT_AUTHORITY, false),
        AccountMeta::new_readonly(PUMP_PROGRAM, false),
    ];

    Instruction {
        program_id: PUMP_PROGRAM,
        accounts,
        data: encode_buy_data(size.token_amount, size.max_sol_cost),
    }
}

/// Compiles and signs the full buy transaction against one recent blockhash.
/// The ATA create is idempotent so a pre-existing token account is a no-op,
/// never a failure.
pub fn build_buy_transaction(
    payer: &Keypair,
    mint: &Pubkey,
    derived: &DerivedAccounts,
    size: TradeSize,
    priority_fee: u64,
    recent_blockhash: Hash,
) -> Result<VersionedTransaction> {
    let payer_key = payer.pubkey();
    let payer_ata = get_associated_token_address(&payer_key, mint);

    let instructions = [
        create_associated_token_account_idempotent(&payer_key, &payer_key, mint, &spl_token::id()),
        ComputeBudgetInstruction::set_compute_unit_price(priority_fee),
        buy_instruction(&payer_key, &payer_ata, mint, derived, size),
    ];

    let message = v0::Message::try_compile(&payer_key, &instructions, &[], recent_blockhash)?;
    let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[payer])?;
    Ok(tx)
}

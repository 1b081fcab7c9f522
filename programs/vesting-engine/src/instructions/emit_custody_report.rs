use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::error::EngineError;
use crate::state::EngineState;

/// Public custody query: emits the aggregate position and returns the
/// expected custodial balance. Conservation holds when the vault
/// balance equals `total_committed - total_withdrawn`.
pub fn emit_custody_report(ctx: Context<EmitCustodyReport>) -> Result<u64> {
    let st = &ctx.accounts.engine_state;
    let custodial_balance = st.custodial_balance()?;

    emit!(CustodyReport {
        vault_balance: ctx.accounts.vault.amount,
        custodial_balance,
        total_committed: st.total_committed,
        total_withdrawn: st.total_withdrawn,
        schedule_count: st.schedule_count,
        cursor: st.cursor,
    });

    Ok(custodial_balance)
}

#[derive(Accounts)]
pub struct EmitCustodyReport<'info> {
    #[account(seeds = [b"engine_state"], bump)]
    pub engine_state: Account<'info, EngineState>,

    #[account(
        seeds = [b"vault", engine_state.key().as_ref()],
        bump,
        constraint = vault.mint == engine_state.mint @ EngineError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,
}

#[event]
pub struct CustodyReport {
    pub vault_balance: u64,
    pub custodial_balance: u64,
    pub total_committed: u64,
    pub total_withdrawn: u64,
    pub schedule_count: u32,
    pub cursor: u32,
}

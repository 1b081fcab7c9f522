use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::error::EngineError;
use crate::state::{EngineState, ScheduleBook};

pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    // Capture AccountInfo before taking mutable borrows below.
    let engine_state_ai = ctx.accounts.engine_state.to_account_info();
    let engine_state_bump = ctx.bumps.engine_state;

    let st = &mut ctx.accounts.engine_state;
    let book = &mut ctx.accounts.schedule_book;
    let beneficiary = ctx.accounts.beneficiary.key();

    let index = book
        .find_index(st.schedule_count, &beneficiary)
        .ok_or(EngineError::BeneficiaryNotFound)?;
    let entry = &mut book.entries[index];

    let now = Clock::get()?.unix_timestamp;
    require!(entry.cliff_passed(now), EngineError::CliffNotReached);

    require!(amount > 0, EngineError::InvalidAmount);
    let available = entry.available_to_withdraw()?;
    require!(amount <= available, EngineError::InsufficientAvailableBalance);

    require_keys_eq!(
        ctx.accounts.beneficiary_token_account.mint,
        st.mint,
        EngineError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.beneficiary_token_account.owner,
        beneficiary,
        EngineError::InvalidTokenAccount
    );
    require!(
        ctx.accounts.vault.amount >= amount,
        EngineError::InsufficientVaultBalance
    );

    entry.withdrawn_amount = entry
        .withdrawn_amount
        .checked_add(amount)
        .ok_or(EngineError::MathOverflow)?;
    st.total_withdrawn = st
        .total_withdrawn
        .checked_add(amount)
        .ok_or(EngineError::MathOverflow)?;
    let withdrawn_total = entry.withdrawn_amount;

    // Transfer-out signed by the engine PDA. A CPI failure aborts the
    // transaction, rolling back the bookkeeping above.
    let signer_seeds: &[&[&[u8]]] = &[&[b"engine_state", &[engine_state_bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.beneficiary_token_account.to_account_info(),
                authority: engine_state_ai,
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(WithdrawalCompleted {
        beneficiary,
        index: index as u32,
        amount,
        withdrawn_total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut, seeds = [b"engine_state"], bump)]
    pub engine_state: Account<'info, EngineState>,

    #[account(
        mut,
        seeds = [b"schedules", engine_state.key().as_ref()],
        bump
    )]
    pub schedule_book: Box<Account<'info, ScheduleBook>>,

    #[account(
        mut,
        seeds = [b"vault", engine_state.key().as_ref()],
        bump,
        constraint = vault.mint == engine_state.mint @ EngineError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub beneficiary: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct WithdrawalCompleted {
    pub beneficiary: Pubkey,
    pub index: u32,
    pub amount: u64,
    pub withdrawn_total: u64,
}

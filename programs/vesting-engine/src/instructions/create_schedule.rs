use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::MAX_SCHEDULES;
use crate::error::EngineError;
use crate::state::{EngineState, ScheduleBook, VestingSchedule};
use crate::utils::accrual;

pub fn create_schedule(
    ctx: Context<CreateSchedule>,
    beneficiary: Pubkey,
    start_ts: i64,
    cliff_ts: i64,
    end_ts: i64,
    total_amount: u64,
) -> Result<()> {
    let st = &mut ctx.accounts.engine_state;
    require_keys_eq!(
        ctx.accounts.admin.key(),
        st.admin,
        EngineError::UnauthorizedAdmin
    );
    require!(beneficiary != Pubkey::default(), EngineError::InvalidPubkey);

    let now = Clock::get()?.unix_timestamp;
    accrual::validate_schedule_params(now, start_ts, cliff_ts, end_ts, total_amount)?;

    let book = &mut ctx.accounts.schedule_book;
    require!(
        (st.schedule_count as usize) < MAX_SCHEDULES,
        EngineError::ScheduleListFull
    );
    // One active schedule per beneficiary; a second creation would
    // orphan the first behind the lookup.
    require!(
        book.find_index(st.schedule_count, &beneficiary).is_none(),
        EngineError::DuplicateBeneficiary
    );

    let amount_per_period = accrual::amount_per_period(total_amount, start_ts, end_ts)?;

    require_keys_eq!(
        ctx.accounts.funding_token_account.mint,
        st.mint,
        EngineError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.funding_token_account.owner,
        ctx.accounts.admin.key(),
        EngineError::InvalidTokenAccount
    );

    // Transfer-in of the full allocation; a CPI failure aborts the
    // transaction before any schedule is recorded.
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funding_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        total_amount,
    )?;

    let index = st.schedule_count;
    book.entries[index as usize] = VestingSchedule {
        beneficiary,
        start_ts,
        cliff_ts,
        end_ts,
        last_accrual_ts: start_ts,
        total_amount,
        amount_per_period,
        released_amount: 0,
        withdrawn_amount: 0,
    };
    st.schedule_count = st
        .schedule_count
        .checked_add(1)
        .ok_or(EngineError::MathOverflow)?;
    st.total_committed = st
        .total_committed
        .checked_add(total_amount)
        .ok_or(EngineError::MathOverflow)?;

    emit!(ScheduleCreated {
        beneficiary,
        index,
        start_ts,
        cliff_ts,
        end_ts,
        total_amount,
        amount_per_period,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateSchedule<'info> {
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
    pub funding_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ScheduleCreated {
    pub beneficiary: Pubkey,
    pub index: u32,
    pub start_ts: i64,
    pub cliff_ts: i64,
    pub end_ts: i64,
    pub total_amount: u64,
    pub amount_per_period: u64,
}

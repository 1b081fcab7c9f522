use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{EngineState, ScheduleBook};

pub fn initialize_engine(ctx: Context<InitializeEngine>) -> Result<()> {
    let st = &mut ctx.accounts.engine_state;
    st.mint = ctx.accounts.mint.key();
    st.admin = ctx.accounts.admin.key();
    st.cursor = 0;
    st.schedule_count = 0;
    st.total_committed = 0;
    st.total_withdrawn = 0;

    // The schedule book starts zeroed (all-default entries); the live
    // prefix is delimited by `schedule_count`.

    emit!(EngineInitialized {
        mint: st.mint,
        admin: st.admin,
        vault: ctx.accounts.vault.key(),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeEngine<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + EngineState::SIZE,
        seeds = [b"engine_state"],
        bump
    )]
    pub engine_state: Account<'info, EngineState>,

    #[account(
        init,
        payer = admin,
        space = ScheduleBook::space(),
        seeds = [b"schedules", engine_state.key().as_ref()],
        bump
    )]
    pub schedule_book: Box<Account<'info, ScheduleBook>>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = engine_state,
        seeds = [b"vault", engine_state.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct EngineInitialized {
    pub mint: Pubkey,
    pub admin: Pubkey,
    pub vault: Pubkey,
}

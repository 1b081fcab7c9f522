use anchor_lang::prelude::*;

use crate::constants::MAX_UPKEEP_BATCH;
use crate::state::{EngineState, ScheduleBook};
use crate::utils::upkeep;

/// Applies a batch of accruals selected by a prior `scan_upkeep`.
///
/// `indices` arrives from the keeper and is untrusted: every index is
/// re-validated against current state, and a stale or malformed batch
/// fails whole. Permissionless by design; the re-validation is the
/// authorization.
pub fn apply_upkeep(ctx: Context<ApplyUpkeep>, indices: Vec<u32>) -> Result<()> {
    let st = &mut ctx.accounts.engine_state;
    let book = &mut ctx.accounts.schedule_book;
    let now = Clock::get()?.unix_timestamp;

    let (applied, next_cursor) = upkeep::apply_batch(
        &mut book.entries,
        st.schedule_count,
        &indices,
        now,
        MAX_UPKEEP_BATCH,
    )?;

    let previous_cursor = st.cursor;
    st.cursor = next_cursor;

    for item in &applied {
        emit!(AccrualApplied {
            beneficiary: book.entries[item.index as usize].beneficiary,
            index: item.index,
            amount: item.amount,
            released_total: item.released_total,
        });
    }
    emit!(UpkeepPerformed {
        batch_size: applied.len() as u32,
        previous_cursor,
        next_cursor,
        now_ts: now,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ApplyUpkeep<'info> {
    #[account(mut, seeds = [b"engine_state"], bump)]
    pub engine_state: Account<'info, EngineState>,

    #[account(
        mut,
        seeds = [b"schedules", engine_state.key().as_ref()],
        bump
    )]
    pub schedule_book: Box<Account<'info, ScheduleBook>>,
}

#[event]
pub struct AccrualApplied {
    pub beneficiary: Pubkey,
    pub index: u32,
    pub amount: u64,
    pub released_total: u64,
}

#[event]
pub struct UpkeepPerformed {
    pub batch_size: u32,
    pub previous_cursor: u32,
    pub next_cursor: u32,
    pub now_ts: i64,
}

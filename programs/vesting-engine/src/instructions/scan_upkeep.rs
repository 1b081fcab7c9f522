use anchor_lang::prelude::*;

use crate::constants::MAX_UPKEEP_BATCH;
use crate::state::{EngineState, ScheduleBook};
use crate::utils::upkeep;

/// Work descriptor handed back to `apply_upkeep` by the keeper.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepDecision {
    pub work_pending: bool,
    pub indices: Vec<u32>,
}

/// Read-only eligibility scan. No account is writable; the keeper may
/// simulate this speculatively and arbitrarily often.
pub fn scan_upkeep(ctx: Context<ScanUpkeep>) -> Result<UpkeepDecision> {
    let st = &ctx.accounts.engine_state;
    let book = &ctx.accounts.schedule_book;
    let now = Clock::get()?.unix_timestamp;

    let indices = upkeep::scan_eligible(
        &book.entries,
        st.schedule_count,
        st.cursor,
        now,
        MAX_UPKEEP_BATCH,
    );

    emit!(UpkeepScanned {
        cursor: st.cursor,
        eligible_count: indices.len() as u32,
        now_ts: now,
    });

    Ok(UpkeepDecision {
        work_pending: !indices.is_empty(),
        indices,
    })
}

#[derive(Accounts)]
pub struct ScanUpkeep<'info> {
    #[account(seeds = [b"engine_state"], bump)]
    pub engine_state: Account<'info, EngineState>,

    #[account(
        seeds = [b"schedules", engine_state.key().as_ref()],
        bump
    )]
    pub schedule_book: Box<Account<'info, ScheduleBook>>,
}

#[event]
pub struct UpkeepScanned {
    pub cursor: u32,
    pub eligible_count: u32,
    pub now_ts: i64,
}

use anchor_lang::prelude::*;

use crate::constants::{MAX_SCHEDULES, PERIOD_LENGTH};
use crate::error::EngineError;

/// One vesting schedule. A beneficiary holds at most one.
///
/// Invariants: `start_ts <= cliff_ts <= end_ts`, `total_amount > 0`,
/// `0 <= withdrawn_amount <= released_amount <= total_amount`.
/// All fields except `released_amount`, `withdrawn_amount` and
/// `last_accrual_ts` are immutable after creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub beneficiary: Pubkey,
    pub start_ts: i64,
    pub cliff_ts: i64,
    pub end_ts: i64,
    /// Timestamp of the last applied accrual; starts at `start_ts`.
    pub last_accrual_ts: i64,
    pub total_amount: u64,
    /// Fixed at creation: `total_amount / period_count`, floor division.
    pub amount_per_period: u64,
    /// Accrued (not necessarily paid out); monotone non-decreasing.
    pub released_amount: u64,
    /// Paid out; monotone non-decreasing.
    pub withdrawn_amount: u64,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // beneficiary
        8 +  // start_ts
        8 +  // cliff_ts
        8 +  // end_ts
        8 +  // last_accrual_ts
        8 +  // total_amount
        8 +  // amount_per_period
        8 +  // released_amount
        8;   // withdrawn_amount

    /// Fully accrued; nothing left to release.
    pub fn is_exhausted(&self) -> bool {
        self.released_amount == self.total_amount
    }

    /// Upkeep eligibility: a full period has elapsed since the last
    /// accrual (strictly more than `PERIOD_LENGTH`) and the schedule is
    /// not exhausted.
    pub fn is_accrual_due(&self, now_ts: i64) -> bool {
        now_ts.saturating_sub(self.last_accrual_ts) > PERIOD_LENGTH && !self.is_exhausted()
    }

    /// Withdrawals are gated on the cliff regardless of accrued amount.
    pub fn cliff_passed(&self, now_ts: i64) -> bool {
        now_ts >= self.cliff_ts
    }

    /// Accrued-but-unpaid balance.
    pub fn available_to_withdraw(&self) -> Result<u64> {
        self.released_amount
            .checked_sub(self.withdrawn_amount)
            .ok_or_else(|| EngineError::MathOverflow.into())
    }
}

/// PDA holding the full schedule book (append-only, indices stable).
/// The live prefix length is `EngineState::schedule_count`.
#[account]
pub struct ScheduleBook {
    pub entries: [VestingSchedule; MAX_SCHEDULES],
}

impl ScheduleBook {
    /// Space for discriminator + fixed entries array.
    pub const fn space() -> usize {
        8 + MAX_SCHEDULES * VestingSchedule::SIZE
    }

    /// Beneficiary -> index lookup over the live prefix.
    pub fn find_index(&self, count: u32, beneficiary: &Pubkey) -> Option<usize> {
        self.entries
            .iter()
            .take(count as usize)
            .position(|e| e.beneficiary == *beneficiary)
    }
}

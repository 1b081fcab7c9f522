use anchor_lang::prelude::*;

/// Singleton engine state PDA.
#[account]
pub struct EngineState {
    /// Token mint under custody.
    pub mint: Pubkey,
    /// Admin authority; gates schedule creation only.
    pub admin: Pubkey,
    /// Index at which the next upkeep scan begins. Wraps modulo the
    /// live schedule count; advanced only by `apply_upkeep`.
    pub cursor: u32,
    /// Number of live entries in the schedule book (append-only).
    pub schedule_count: u32,
    /// Sum of `total_amount` across all schedules.
    pub total_committed: u64,
    /// Sum of `withdrawn_amount` across all schedules.
    pub total_withdrawn: u64,
}

impl EngineState {
    pub const SIZE: usize =
        32 + // mint
        32 + // admin
        4 +  // cursor
        4 +  // schedule_count
        8 +  // total_committed
        8;   // total_withdrawn

    /// Expected custodial balance: committed minus paid out. The vault
    /// token balance must equal this at all times.
    pub fn custodial_balance(&self) -> Result<u64> {
        self.total_committed
            .checked_sub(self.total_withdrawn)
            .ok_or_else(|| crate::error::EngineError::MathOverflow.into())
    }
}

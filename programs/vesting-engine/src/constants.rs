//! Program-wide constants.

/// Max vesting schedules held in the schedule book PDA.
pub const MAX_SCHEDULES: usize = 64;

/// Max schedule indices processed per `apply_upkeep` call (batch bound B).
pub const MAX_UPKEEP_BATCH: usize = 5;

/// Accrual period length in seconds (one UTC day).
pub const PERIOD_LENGTH: i64 = 86_400;

/// Minimum schedule duration: `end - start` must be at least this.
pub const MIN_VESTING_DURATION: i64 = 7 * PERIOD_LENGTH;

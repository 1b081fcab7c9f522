//! Daily-accrual arithmetic.
//!
//! - period_count = (end - start) / PERIOD_LENGTH, floor
//! - amount_per_period = total / period_count, floor; the final period
//!   absorbs the remainder by capping at the remaining balance, so a
//!   schedule whose duration is not a whole number of periods exhausts
//!   before `end_ts`.

use crate::constants::{MIN_VESTING_DURATION, PERIOD_LENGTH};
use crate::error::EngineError;
use crate::state::VestingSchedule;

/// Creation-time validation, in order: the amount, then the time
/// window (future start, `start <= cliff <= end`, minimum duration).
pub fn validate_schedule_params(
    now_ts: i64,
    start_ts: i64,
    cliff_ts: i64,
    end_ts: i64,
    total_amount: u64,
) -> Result<(), EngineError> {
    if total_amount == 0 {
        return Err(EngineError::InvalidAmount);
    }
    if start_ts < now_ts || start_ts > cliff_ts || cliff_ts > end_ts {
        return Err(EngineError::InvalidPeriod);
    }
    if end_ts.saturating_sub(start_ts) < MIN_VESTING_DURATION {
        return Err(EngineError::InvalidPeriod);
    }
    Ok(())
}

/// Number of whole accrual periods between `start_ts` and `end_ts`.
pub fn period_count(start_ts: i64, end_ts: i64) -> Result<u64, EngineError> {
    let duration = end_ts.checked_sub(start_ts).ok_or(EngineError::MathOverflow)?;
    if duration < MIN_VESTING_DURATION {
        return Err(EngineError::InvalidPeriod);
    }
    Ok((duration / PERIOD_LENGTH) as u64)
}

/// Fixed per-period release rate, computed once at creation.
pub fn amount_per_period(total_amount: u64, start_ts: i64, end_ts: i64) -> Result<u64, EngineError> {
    let periods = period_count(start_ts, end_ts)?;
    if periods == 0 {
        return Err(EngineError::InvalidPeriod);
    }
    Ok(total_amount / periods)
}

/// Amount released by one accrual: the per-period rate, capped at the
/// remaining balance so `released_amount` never exceeds `total_amount`.
pub fn release_amount(entry: &VestingSchedule) -> Result<u64, EngineError> {
    let remaining = entry
        .total_amount
        .checked_sub(entry.released_amount)
        .ok_or(EngineError::MathOverflow)?;
    Ok(entry.amount_per_period.min(remaining))
}

//! Upkeep core: the read-only eligibility scan and the mutating batch
//! application, both over the schedule book's live prefix.
//!
//! The scan result travels through an untrusted channel (the external
//! keeper) before it comes back to `apply_batch`, so the applier
//! re-derives eligibility from current state and rejects the whole
//! batch if any index no longer qualifies. Scan output is a hint, not
//! a lease.

use crate::error::EngineError;
use crate::state::VestingSchedule;
use crate::utils::accrual;

/// One accrual applied by `apply_batch`, for event reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedAccrual {
    pub index: u32,
    pub amount: u64,
    pub released_total: u64,
}

/// Read-only scan: starting at `cursor`, walk the live prefix to its
/// end and collect up to `max_batch` indices whose accrual is due.
///
/// A scan does not wrap past the end while it is finding work; the
/// applier's cursor update handles wraparound across triggers. If the
/// forward pass finds nothing at all, the scan restarts from index 0:
/// without that fallback a cursor stranded after a run of exhausted
/// tail entries would never report the live entries behind it, and the
/// cursor (advanced only on apply) could never move again.
pub fn scan_eligible(
    entries: &[VestingSchedule],
    count: u32,
    cursor: u32,
    now_ts: i64,
    max_batch: usize,
) -> Vec<u32> {
    let due = forward_scan(entries, cursor, count, now_ts, max_batch);
    if due.is_empty() && cursor > 0 {
        return forward_scan(entries, 0, count, now_ts, max_batch);
    }
    due
}

fn forward_scan(
    entries: &[VestingSchedule],
    from: u32,
    count: u32,
    now_ts: i64,
    max_batch: usize,
) -> Vec<u32> {
    let mut due = Vec::new();
    for idx in from..count {
        if due.len() == max_batch {
            break;
        }
        if entries[idx as usize].is_accrual_due(now_ts) {
            due.push(idx);
        }
    }
    due
}

/// Mutating step: validate the untrusted index list against current
/// state, then apply one accrual per index. Returns the applied
/// accruals and the next cursor position.
///
/// All-or-nothing: validation completes over the whole batch before
/// any entry is mutated. A duplicated index is a replayed decision and
/// fails the same way a stale one does.
pub fn apply_batch(
    entries: &mut [VestingSchedule],
    count: u32,
    indices: &[u32],
    now_ts: i64,
    max_batch: usize,
) -> Result<(Vec<AppliedAccrual>, u32), EngineError> {
    if indices.is_empty() {
        return Err(EngineError::EmptyBatch);
    }
    if indices.len() > max_batch {
        return Err(EngineError::BatchTooLarge);
    }

    for (i, &idx) in indices.iter().enumerate() {
        if idx >= count || !entries[idx as usize].is_accrual_due(now_ts) {
            return Err(EngineError::StaleOrInvalidBatch);
        }
        if indices[..i].contains(&idx) {
            return Err(EngineError::StaleOrInvalidBatch);
        }
    }

    let mut applied = Vec::with_capacity(indices.len());
    for &idx in indices {
        let entry = &mut entries[idx as usize];
        let amount = accrual::release_amount(entry)?;
        entry.released_amount = entry
            .released_amount
            .checked_add(amount)
            .ok_or(EngineError::MathOverflow)?;
        entry.last_accrual_ts = now_ts;
        applied.push(AppliedAccrual {
            index: idx,
            amount,
            released_total: entry.released_amount,
        });
    }

    // Advance the scan position past the last processed entry, wrapping
    // so successive triggers eventually revisit every schedule.
    let last = *indices.last().ok_or(EngineError::EmptyBatch)?;
    let next_cursor = last
        .checked_add(1)
        .ok_or(EngineError::MathOverflow)?
        .checked_rem(count)
        .ok_or(EngineError::MathOverflow)?;

    Ok((applied, next_cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_UPKEEP_BATCH, PERIOD_LENGTH};
    use anchor_lang::prelude::Pubkey;

    const DAY: i64 = PERIOD_LENGTH;

    /// Schedule as created at `start`: 700 units over 70 days.
    fn seventy_day_schedule(start: i64) -> VestingSchedule {
        VestingSchedule {
            beneficiary: Pubkey::new_unique(),
            start_ts: start,
            cliff_ts: start + 7 * DAY,
            end_ts: start + 70 * DAY,
            last_accrual_ts: start,
            total_amount: 700,
            amount_per_period: 10,
            released_amount: 0,
            withdrawn_amount: 0,
        }
    }

    #[test]
    fn scan_is_empty_before_a_full_period_elapses() {
        let entries = [seventy_day_schedule(0)];
        assert!(scan_eligible(&entries, 1, 0, DAY, MAX_UPKEEP_BATCH).is_empty());
        assert_eq!(scan_eligible(&entries, 1, 0, 2 * DAY, MAX_UPKEEP_BATCH), vec![0]);
    }

    #[test]
    fn scan_starts_at_cursor_and_does_not_wrap_while_finding_work() {
        let entries = [
            seventy_day_schedule(0),
            seventy_day_schedule(0),
            seventy_day_schedule(0),
        ];
        // Cursor past index 0: index 0 is due but waits for the next
        // trigger after the cursor wraps via apply.
        assert_eq!(scan_eligible(&entries, 3, 1, 2 * DAY, MAX_UPKEEP_BATCH), vec![1, 2]);
    }

    #[test]
    fn scan_falls_back_to_the_head_when_the_tail_is_dead() {
        let mut entries = [seventy_day_schedule(0), seventy_day_schedule(0)];
        entries[1].released_amount = 700; // exhausted tail
        // Cursor stranded on the exhausted entry; the live entry at
        // index 0 must still be reported.
        assert_eq!(scan_eligible(&entries, 2, 1, 2 * DAY, MAX_UPKEEP_BATCH), vec![0]);
    }

    #[test]
    fn scan_caps_at_the_batch_bound() {
        let entries: Vec<_> = (0..8).map(|_| seventy_day_schedule(0)).collect();
        let due = scan_eligible(&entries, 8, 0, 2 * DAY, MAX_UPKEEP_BATCH);
        assert_eq!(due, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn apply_advances_cursor_and_wraps_at_the_end() {
        let mut entries = [seventy_day_schedule(0), seventy_day_schedule(0)];
        let (applied, cursor) =
            apply_batch(&mut entries, 2, &[0], 2 * DAY, MAX_UPKEEP_BATCH).unwrap();
        assert_eq!(applied[0].amount, 10);
        assert_eq!(cursor, 1);

        let (_, cursor) = apply_batch(&mut entries, 2, &[1], 2 * DAY, MAX_UPKEEP_BATCH).unwrap();
        assert_eq!(cursor, 0);
    }

    #[test]
    fn replayed_descriptor_fails_stale() {
        let mut entries = [seventy_day_schedule(0)];
        apply_batch(&mut entries, 1, &[0], 2 * DAY, MAX_UPKEEP_BATCH).unwrap();
        assert!(matches!(
            apply_batch(&mut entries, 1, &[0], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::StaleOrInvalidBatch)
        ));
        // State is unchanged by the failed replay.
        assert_eq!(entries[0].released_amount, 10);
        assert_eq!(entries[0].last_accrual_ts, 2 * DAY);
    }

    #[test]
    fn stale_batch_applies_nothing() {
        let mut entries = [seventy_day_schedule(0), seventy_day_schedule(0)];
        entries[1].released_amount = 700; // exhausted => ineligible
        assert!(matches!(
            apply_batch(&mut entries, 2, &[0, 1], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::StaleOrInvalidBatch)
        ));
        assert_eq!(entries[0].released_amount, 0);
        assert_eq!(entries[0].last_accrual_ts, 0);
    }

    #[test]
    fn out_of_range_and_duplicate_indices_fail_stale() {
        let mut entries = [seventy_day_schedule(0)];
        assert!(matches!(
            apply_batch(&mut entries, 1, &[1], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::StaleOrInvalidBatch)
        ));
        assert!(matches!(
            apply_batch(&mut entries, 1, &[0, 0], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::StaleOrInvalidBatch)
        ));
        assert_eq!(entries[0].released_amount, 0);
    }

    #[test]
    fn empty_and_oversized_batches_are_rejected() {
        let mut entries = [seventy_day_schedule(0)];
        assert!(matches!(
            apply_batch(&mut entries, 1, &[], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::EmptyBatch)
        ));
        assert!(matches!(
            apply_batch(&mut entries, 1, &[0; 6], 2 * DAY, MAX_UPKEEP_BATCH),
            Err(EngineError::BatchTooLarge)
        ));
    }

    #[test]
    fn remainder_is_absorbed_by_the_final_accrual() {
        // 100 units, 3 periods => 33 per period: 33, 33, 33, then 1.
        let mut entries = [VestingSchedule {
            total_amount: 100,
            amount_per_period: 33,
            ..seventy_day_schedule(0)
        }];
        let mut released = Vec::new();
        for day in 0..5 {
            let now = (2 + 2 * day) * DAY;
            let due = scan_eligible(&entries, 1, 0, now, MAX_UPKEEP_BATCH);
            if due.is_empty() {
                break;
            }
            let (applied, _) = apply_batch(&mut entries, 1, &due, now, MAX_UPKEEP_BATCH).unwrap();
            released.push(applied[0].amount);
        }
        assert_eq!(released, vec![33, 33, 33, 1]);
        assert_eq!(entries[0].released_amount, 100);
        // Exhausted early, well before end_ts elapses.
        assert!(entries[0].last_accrual_ts < entries[0].end_ts);
    }

    #[test]
    fn walkthrough_accrue_then_withdraw_behind_the_cliff() {
        // 700 over 70 days, cliff at day 7.
        let mut entries = [seventy_day_schedule(0)];
        let total_committed: u64 = 700;
        let mut total_withdrawn: u64 = 0;

        // Day 1: no full period elapsed yet.
        assert!(scan_eligible(&entries, 1, 0, DAY, MAX_UPKEEP_BATCH).is_empty());

        // Day 2: one period due; apply accrues a single period.
        let due = scan_eligible(&entries, 1, 0, 2 * DAY, MAX_UPKEEP_BATCH);
        apply_batch(&mut entries, 1, &due, 2 * DAY, MAX_UPKEEP_BATCH).unwrap();
        assert_eq!(entries[0].released_amount, 10);

        // Day 3: accrued but still behind the cliff.
        assert!(!entries[0].cliff_passed(3 * DAY));

        // Day 8: past the cliff; 10 available, not 11.
        assert!(entries[0].cliff_passed(8 * DAY));
        assert_eq!(entries[0].available_to_withdraw().unwrap(), 10);
        entries[0].withdrawn_amount += 10;
        total_withdrawn += 10;
        assert_eq!(entries[0].available_to_withdraw().unwrap(), 0);

        // Conservation: the custodial pool equals committed minus paid.
        assert_eq!(total_committed - total_withdrawn, 690);
        assert!(entries[0].withdrawn_amount <= entries[0].released_amount);
        assert!(entries[0].released_amount <= entries[0].total_amount);
    }

    #[test]
    fn repeated_scan_apply_cycles_exhaust_every_schedule() {
        // More schedules than the batch bound, with uneven totals so
        // some exhaust early: the round-robin cursor must not starve
        // anything, including entries stranded behind a dead tail.
        let mut entries: Vec<_> = (0..7)
            .map(|i| VestingSchedule {
                total_amount: 30 + 10 * i,
                amount_per_period: 10,
                ..seventy_day_schedule(0)
            })
            .collect();
        let count = entries.len() as u32;
        let mut cursor = 0u32;

        // One keeper trigger every other day, as many as it takes.
        for day in 1..60 {
            let now = day * 2 * DAY;
            let due = scan_eligible(&entries, count, cursor, now, MAX_UPKEEP_BATCH);
            if !due.is_empty() {
                let (_, next) =
                    apply_batch(&mut entries, count, &due, now, MAX_UPKEEP_BATCH).unwrap();
                cursor = next;
            }
            // Invariant chain holds after every trigger.
            for e in &entries {
                assert!(e.withdrawn_amount <= e.released_amount);
                assert!(e.released_amount <= e.total_amount);
            }
        }

        assert!(entries.iter().all(VestingSchedule::is_exhausted));
    }
}

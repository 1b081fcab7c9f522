//! Automated vesting engine.
//!
//! Holds a custodial pool of a single SPL token and releases it to
//! beneficiaries on a daily accrual, driven by an external keeper
//! through a two-phase protocol: a read-only `scan_upkeep` that selects
//! up to a batch bound of due schedules starting at a round-robin
//! cursor, and a mutating `apply_upkeep` that re-validates and applies
//! the batch. Beneficiaries withdraw their accrued balance themselves
//! once past their cliff.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("3gui6Fjbmui75qCyjCCia5wbSwq21rUQivCyBgfEhYBT");

#[program]
pub mod vesting_engine {
    use super::*;

    pub fn initialize_engine(ctx: Context<InitializeEngine>) -> Result<()> {
        instructions::initialize_engine(ctx)
    }

    pub fn create_schedule(
        ctx: Context<CreateSchedule>,
        beneficiary: Pubkey,
        start_ts: i64,
        cliff_ts: i64,
        end_ts: i64,
        total_amount: u64,
    ) -> Result<()> {
        instructions::create_schedule(ctx, beneficiary, start_ts, cliff_ts, end_ts, total_amount)
    }

    pub fn scan_upkeep(ctx: Context<ScanUpkeep>) -> Result<UpkeepDecision> {
        instructions::scan_upkeep(ctx)
    }

    pub fn apply_upkeep(ctx: Context<ApplyUpkeep>, indices: Vec<u32>) -> Result<()> {
        instructions::apply_upkeep(ctx, indices)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw(ctx, amount)
    }

    pub fn emit_custody_report(ctx: Context<EmitCustodyReport>) -> Result<u64> {
        instructions::emit_custody_report(ctx)
    }
}

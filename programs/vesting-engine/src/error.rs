use anchor_lang::prelude::*;

/// Custom error codes for the vesting engine.
#[error_code]
pub enum EngineError {
    #[msg("Unauthorized: admin signature required")]
    UnauthorizedAdmin,

    #[msg("Invalid public key")]
    InvalidPubkey,

    #[msg("Invalid amount (must be > 0)")]
    InvalidAmount,

    #[msg("Invalid vesting period")]
    InvalidPeriod,

    #[msg("Schedule book is full")]
    ScheduleListFull,

    #[msg("Beneficiary already has an active schedule")]
    DuplicateBeneficiary,

    #[msg("Empty upkeep batch")]
    EmptyBatch,

    #[msg("Upkeep batch exceeds the batch bound")]
    BatchTooLarge,

    #[msg("Stale or invalid upkeep batch")]
    StaleOrInvalidBatch,

    #[msg("Beneficiary has no schedule")]
    BeneficiaryNotFound,

    #[msg("Cliff not reached")]
    CliffNotReached,

    #[msg("Requested amount exceeds accrued available balance")]
    InsufficientAvailableBalance,

    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}

pub mod accrual;
pub mod upkeep;

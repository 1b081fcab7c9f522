pub mod initialize_engine;
pub mod create_schedule;
pub mod scan_upkeep;
pub mod apply_upkeep;
pub mod withdraw;
pub mod emit_custody_report;

pub use initialize_engine::*;
pub use create_schedule::*;
pub use scan_upkeep::*;
pub use apply_upkeep::*;
pub use withdraw::*;
pub use emit_custody_report::*;

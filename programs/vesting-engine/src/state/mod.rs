pub mod engine_state;
pub mod schedules;

pub use engine_state::*;
pub use schedules::*;

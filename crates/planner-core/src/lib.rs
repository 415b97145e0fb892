pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

pub mod accounts;
pub mod contribution;
pub mod expenses;
pub mod household;
pub mod income;
pub mod projection;
pub mod strategy;

#[cfg(feature = "store")]
pub mod planner;

pub use error::PlannerError;
pub use types::*;

/// Standard result type for the fallible planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

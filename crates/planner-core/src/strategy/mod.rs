pub mod allocation;

pub use allocation::{
    compare_strategy, compare_to_current, target_allocation, InvestmentStrategy,
    StrategyComparison,
};

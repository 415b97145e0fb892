pub mod assets;
#[cfg(feature = "cash_flow")]
pub mod cash_flow;

pub use assets::{project_assets, AssetProjectionInput, MarketCondition, ProjectionPoint};
#[cfg(feature = "cash_flow")]
pub use cash_flow::{project_cash_flow, project_cash_flow_seeded, CashFlowInput, CashFlowPoint};

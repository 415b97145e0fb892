pub mod sources;

pub use sources::{summarize_income, IncomeSources, IncomeSummary, SocialSecurity};

//! Persisted plan document, its controller, and the combined analysis.

pub mod analysis;
pub mod controller;
pub mod document;
pub mod store;

pub use analysis::{
    analyze, analyze_with_metadata, asset_projection_input, PlanAnalysis, ScenarioReadiness,
};
pub use controller::Planner;
pub use document::{PlanDocument, STORAGE_KEY};
pub use store::{DocumentStore, FileStore, MemoryStore};

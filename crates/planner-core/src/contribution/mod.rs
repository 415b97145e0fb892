pub mod modeling;

pub use modeling::{
    allocate_contribution, model_additional_contribution, ContributionEstimate,
    ContributionModelInput,
};

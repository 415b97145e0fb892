use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::PlannerResult;

/// Oldest age any projection runs to. Larger ages are clamped to it.
pub const MAX_AGE: u32 = 150;

/// Retirement timing for the household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetirementProfile {
    pub retirement_age: u32,
    /// Only meaningful when planning with a partner.
    pub partner_retirement_age: u32,
    /// Terminal age for every projection.
    pub plan_to_age: u32,
    /// State of residence, display only.
    pub state: String,
}

impl Default for RetirementProfile {
    fn default() -> Self {
        RetirementProfile {
            retirement_age: 67,
            partner_retirement_age: 67,
            plan_to_age: 95,
            state: String::new(),
        }
    }
}

/// Whole years from `from_age` to `to_age`, with both clamped to [`MAX_AGE`].
/// `None` when `to_age` is the earlier of the two.
pub fn years_until(from_age: u32, to_age: u32) -> Option<u32> {
    to_age.min(MAX_AGE).checked_sub(from_age.min(MAX_AGE))
}

/// Reject any named age above [`MAX_AGE`].
pub fn validate_ages(ages: &[(&str, u32)]) -> PlannerResult<()> {
    for &(field, age) in ages {
        if age > MAX_AGE {
            return Err(PlannerError::InvalidInput {
                field: field.into(),
                reason: format!("age must be at most {MAX_AGE}"),
            });
        }
    }
    Ok(())
}

impl RetirementProfile {
    pub fn validate(&self) -> PlannerResult<()> {
        validate_ages(&[
            ("retirement_age", self.retirement_age),
            ("partner_retirement_age", self.partner_retirement_age),
            ("plan_to_age", self.plan_to_age),
        ])
    }
}

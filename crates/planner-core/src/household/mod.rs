pub mod demographics;
pub mod profile;

pub use demographics::{current_age, Household, HouseholdAges, Person, PARTNER_LABEL};
pub use profile::{validate_ages, years_until, RetirementProfile, MAX_AGE};

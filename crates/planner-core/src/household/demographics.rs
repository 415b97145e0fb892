use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::Assumptions;
use crate::types::Money;

/// Owner label that always identifies the partner, whatever their name.
pub const PARTNER_LABEL: &str = "Partner";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One adult in the household.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub name: String,
    /// Free-form date string as entered; age is derived from it.
    pub date_of_birth: String,
    pub annual_income: Money,
    pub annual_bonus: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Household {
    pub primary: Person,
    /// Kept even when not planning with a partner so the values survive a toggle.
    pub partner: Person,
    pub planning_with_partner: bool,
}

/// Resolved ages for the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdAges {
    pub primary: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<u32>,
}

impl Household {
    /// The label accounts use to mark the partner as owner.
    pub fn partner_identifier(&self) -> &str {
        let name = self.partner.name.trim();
        if name.is_empty() {
            PARTNER_LABEL
        } else {
            name
        }
    }

    /// True when `owner` names the partner, either by name or by the generic label.
    pub fn is_partner_owner(&self, owner: &str) -> bool {
        let owner = owner.trim();
        owner.eq_ignore_ascii_case(self.partner_identifier())
            || owner.eq_ignore_ascii_case(PARTNER_LABEL)
    }

    pub fn ages(&self, assumptions: &Assumptions) -> HouseholdAges {
        let age_of = |p: &Person| {
            current_age(
                &p.date_of_birth,
                assumptions.current_year,
                assumptions.default_age,
            )
        };
        HouseholdAges {
            primary: age_of(&self.primary),
            partner: self.planning_with_partner.then(|| age_of(&self.partner)),
        }
    }
}

// ---------------------------------------------------------------------------
// Age resolution
// ---------------------------------------------------------------------------

/// Age in whole years as of `current_year`.
///
/// An unparsable date of birth yields `default_age`. A birth year after
/// `current_year` yields 0.
pub fn current_age(dob: &str, current_year: i32, default_age: u32) -> u32 {
    match birth_year(dob) {
        Some(year) => u32::try_from(current_year - year).unwrap_or(0),
        None => default_age,
    }
}

fn birth_year(dob: &str) -> Option<i32> {
    let s = dob.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.year());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.year());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.year());
        }
    }
    // Bare year, e.g. "1985"
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(current_age("1985-06-15", 2025, 40), 40);
        assert_eq!(current_age("1990-01-01", 2025, 40), 35);
    }

    #[test]
    fn test_other_layouts() {
        assert_eq!(current_age("06/15/1980", 2025, 40), 45);
        assert_eq!(current_age("1970-03-02T00:00:00Z", 2025, 40), 55);
        assert_eq!(current_age("1970-03-02T08:30:00", 2025, 40), 55);
        assert_eq!(current_age("1962", 2025, 40), 63);
    }

    #[test]
    fn test_unparsable_returns_default() {
        assert_eq!(current_age("not a date", 2025, 40), 40);
        assert_eq!(current_age("", 2025, 52), 52);
        assert_eq!(current_age("1985-13-45", 2025, 7), 7);
    }

    #[test]
    fn test_future_birth_year_is_zero() {
        assert_eq!(current_age("2030-01-01", 2025, 40), 0);
    }

    #[test]
    fn test_partner_identifier_falls_back_to_label() {
        let mut hh = Household::default();
        assert_eq!(hh.partner_identifier(), PARTNER_LABEL);
        hh.partner.name = "  Sam ".into();
        assert_eq!(hh.partner_identifier(), "Sam");
        assert!(hh.is_partner_owner("sam"));
        assert!(hh.is_partner_owner("Partner"));
        assert!(!hh.is_partner_owner("Jordan"));
    }

    #[test]
    fn test_partner_age_only_when_planning_together() {
        let mut hh = Household::default();
        hh.primary.date_of_birth = "1980-01-01".into();
        hh.partner.date_of_birth = "1982-01-01".into();
        let a = Assumptions::default();

        assert_eq!(hh.ages(&a).partner, None);
        hh.planning_with_partner = true;
        assert_eq!(hh.ages(&a).partner, Some(a.current_year as u32 - 1982));
    }
}

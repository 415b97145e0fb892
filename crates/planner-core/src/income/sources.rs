use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialSecurity {
    pub monthly_amount: Money,
    pub start_age: u32,
    pub enabled: bool,
}

impl Default for SocialSecurity {
    fn default() -> Self {
        SocialSecurity {
            monthly_amount: Decimal::ZERO,
            start_age: 67,
            enabled: true,
        }
    }
}

/// Retirement income entries. Recurring amounts are monthly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeSources {
    pub social_security: SocialSecurity,
    pub pension: Money,
    pub annuity: Money,
    pub other: Money,
    /// Lump sum (inheritance, home sale).
    pub one_time: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub social_security_monthly: Money,
    pub social_security_start_age: u32,
    /// Social Security plus pension, annuity and other.
    pub recurring_monthly: Money,
    pub one_time: Money,
}

/// Monthly recurring retirement income. Disabled Social Security counts as zero.
pub fn summarize_income(sources: &IncomeSources) -> IncomeSummary {
    let ss = &sources.social_security;
    let social_security_monthly = if ss.enabled {
        ss.monthly_amount
    } else {
        Decimal::ZERO
    };

    IncomeSummary {
        social_security_monthly,
        social_security_start_age: ss.start_age,
        recurring_monthly: social_security_monthly
            + sources.pension
            + sources.annuity
            + sources.other,
        one_time: sources.one_time,
    }
}

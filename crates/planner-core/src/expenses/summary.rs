use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Money;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which of the three entry methods is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseMethod {
    #[default]
    Lifestyle,
    Monthly,
    Itemized,
}

/// Lifestyle tier. Unknown tier strings deserialize as `Average`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifestyleTier {
    Below,
    Above,
    #[default]
    #[serde(other)]
    Average,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlySplit {
    pub essential: Money,
    pub non_essential: Money,
}

/// Fixed set of itemized expense categories. Unknown keys read as `Other`;
/// when several unknown keys appear, the last one read wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Healthcare,
    Food,
    Utilities,
    Insurance,
    Entertainment,
    Travel,
    Personal,
    #[serde(other)]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Transportation,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Food,
        ExpenseCategory::Utilities,
        ExpenseCategory::Insurance,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Travel,
        ExpenseCategory::Personal,
        ExpenseCategory::Other,
    ];
}

/// Expense entry in one of three shapes. Values for inactive methods are
/// kept so that switching back restores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpensePlan {
    pub method: ExpenseMethod,
    pub lifestyle: Option<LifestyleTier>,
    pub monthly: MonthlySplit,
    pub itemized: BTreeMap<ExpenseCategory, Money>,
}

/// Monthly expense totals reduced from whichever method is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total: Money,
    pub essential: Money,
    pub discretionary: Money,
    pub discretionary_label: String,
}

// ---------------------------------------------------------------------------
// Lifestyle table
// ---------------------------------------------------------------------------

impl LifestyleTier {
    /// (total, essential, discretionary) monthly amounts for the tier.
    pub fn amounts(self) -> (Money, Money, Money) {
        match self {
            LifestyleTier::Below => (dec!(4100), dec!(3280), dec!(820)),
            LifestyleTier::Average => (dec!(6800), dec!(4760), dec!(2040)),
            LifestyleTier::Above => (dec!(12500), dec!(7500), dec!(5000)),
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Reduce the active expense method to a single summary. Always succeeds.
pub fn summarize(plan: &ExpensePlan) -> ExpenseSummary {
    match plan.method {
        ExpenseMethod::Itemized => {
            // Itemized categories are not split; everything counts as essential.
            let total: Money = plan.itemized.values().copied().sum();
            ExpenseSummary {
                total,
                essential: total,
                discretionary: Decimal::ZERO,
                discretionary_label: "Discretionary".to_string(),
            }
        }
        ExpenseMethod::Monthly => ExpenseSummary {
            total: plan.monthly.essential + plan.monthly.non_essential,
            essential: plan.monthly.essential,
            discretionary: plan.monthly.non_essential,
            discretionary_label: "Non-essential".to_string(),
        },
        ExpenseMethod::Lifestyle => {
            let (total, essential, discretionary) = plan.lifestyle.unwrap_or_default().amounts();
            ExpenseSummary {
                total,
                essential,
                discretionary,
                discretionary_label: "Discretionary".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_monthly_split() {
        let plan = ExpensePlan {
            method: ExpenseMethod::Monthly,
            monthly: MonthlySplit {
                essential: dec!(10666),
                non_essential: dec!(2666),
            },
            ..Default::default()
        };
        assert_eq!(
            summarize(&plan),
            ExpenseSummary {
                total: dec!(13332),
                essential: dec!(10666),
                discretionary: dec!(2666),
                discretionary_label: "Non-essential".into(),
            }
        );
    }

    #[test]
    fn test_lifestyle_tiers() {
        let mut plan = ExpensePlan {
            method: ExpenseMethod::Lifestyle,
            lifestyle: Some(LifestyleTier::Below),
            ..Default::default()
        };
        let s = summarize(&plan);
        assert_eq!((s.total, s.essential, s.discretionary), (dec!(4100), dec!(3280), dec!(820)));
        assert_eq!(s.discretionary_label, "Discretionary");

        plan.lifestyle = Some(LifestyleTier::Above);
        assert_eq!(summarize(&plan).total, dec!(12500));
    }

    #[test]
    fn test_missing_tier_falls_back_to_average() {
        let plan = ExpensePlan {
            method: ExpenseMethod::Lifestyle,
            lifestyle: None,
            ..Default::default()
        };
        assert_eq!(summarize(&plan).total, dec!(6800));
    }

    #[test]
    fn test_unknown_tier_string_reads_as_average() {
        let plan: ExpensePlan =
            serde_json::from_str(r#"{"method": "lifestyle", "lifestyle": "luxurious"}"#).unwrap();
        assert_eq!(plan.lifestyle, Some(LifestyleTier::Average));
        assert_eq!(summarize(&plan).essential, dec!(4760));
    }

    #[test]
    fn test_lifestyle_tiers_serialize_by_name() {
        let json = serde_json::to_string(&[
            LifestyleTier::Below,
            LifestyleTier::Average,
            LifestyleTier::Above,
        ])
        .unwrap();
        assert_eq!(json, r#"["below","average","above"]"#);
    }

    #[test]
    fn test_unknown_category_reads_as_other() {
        let plan: ExpensePlan = serde_json::from_str(
            r#"{"method": "itemized", "itemized": {"housing": "2000", "boats": "300"}}"#,
        )
        .unwrap();
        assert_eq!(plan.itemized.get(&ExpenseCategory::Other), Some(&dec!(300)));
        assert_eq!(summarize(&plan).total, dec!(2300));
    }

    #[test]
    fn test_itemized_is_all_essential() {
        let mut itemized = BTreeMap::new();
        itemized.insert(ExpenseCategory::Housing, dec!(2500));
        itemized.insert(ExpenseCategory::Food, dec!(800));
        itemized.insert(ExpenseCategory::Travel, dec!(400));
        let plan = ExpensePlan {
            method: ExpenseMethod::Itemized,
            itemized,
            ..Default::default()
        };
        let s = summarize(&plan);
        assert_eq!(s.total, dec!(3700));
        assert_eq!(s.essential, dec!(3700));
        assert_eq!(s.discretionary, Decimal::ZERO);
    }

    #[test]
    fn test_switching_method_keeps_other_values() {
        let mut plan = ExpensePlan {
            method: ExpenseMethod::Monthly,
            monthly: MonthlySplit {
                essential: dec!(5000),
                non_essential: dec!(1000),
            },
            ..Default::default()
        };
        plan.method = ExpenseMethod::Lifestyle;
        assert_eq!(summarize(&plan).total, dec!(6800));
        plan.method = ExpenseMethod::Monthly;
        assert_eq!(summarize(&plan).total, dec!(6000));
    }
}

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::AssetMix;

/// Named target asset-mix strategies, most conservative first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentStrategy {
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Conservative")]
    Conservative,
    #[serde(rename = "Moderate with income")]
    ModerateWithIncome,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Balanced")]
    Balanced,
    #[serde(rename = "Growth with income")]
    GrowthWithIncome,
    #[serde(rename = "Growth")]
    Growth,
    #[serde(rename = "Aggressive growth")]
    AggressiveGrowth,
    #[serde(rename = "Most aggressive")]
    MostAggressive,
}

impl InvestmentStrategy {
    pub const ALL: [InvestmentStrategy; 9] = [
        InvestmentStrategy::ShortTerm,
        InvestmentStrategy::Conservative,
        InvestmentStrategy::ModerateWithIncome,
        InvestmentStrategy::Moderate,
        InvestmentStrategy::Balanced,
        InvestmentStrategy::GrowthWithIncome,
        InvestmentStrategy::Growth,
        InvestmentStrategy::AggressiveGrowth,
        InvestmentStrategy::MostAggressive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InvestmentStrategy::ShortTerm => "Short-term",
            InvestmentStrategy::Conservative => "Conservative",
            InvestmentStrategy::ModerateWithIncome => "Moderate with income",
            InvestmentStrategy::Moderate => "Moderate",
            InvestmentStrategy::Balanced => "Balanced",
            InvestmentStrategy::GrowthWithIncome => "Growth with income",
            InvestmentStrategy::Growth => "Growth",
            InvestmentStrategy::AggressiveGrowth => "Aggressive growth",
            InvestmentStrategy::MostAggressive => "Most aggressive",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<InvestmentStrategy> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Target weights: domestic, foreign, bonds, short-term, other.
    pub fn allocation(self) -> AssetMix {
        let (d, f, b, s) = match self {
            InvestmentStrategy::ShortTerm => (dec!(0), dec!(0), dec!(0), dec!(100)),
            InvestmentStrategy::Conservative => (dec!(14), dec!(6), dec!(50), dec!(30)),
            InvestmentStrategy::ModerateWithIncome => (dec!(21), dec!(9), dec!(50), dec!(20)),
            InvestmentStrategy::Moderate => (dec!(28), dec!(12), dec!(45), dec!(15)),
            InvestmentStrategy::Balanced => (dec!(35), dec!(15), dec!(40), dec!(10)),
            InvestmentStrategy::GrowthWithIncome => (dec!(42), dec!(18), dec!(35), dec!(5)),
            InvestmentStrategy::Growth => (dec!(49), dec!(21), dec!(25), dec!(5)),
            InvestmentStrategy::AggressiveGrowth => (dec!(60), dec!(25), dec!(15), dec!(0)),
            InvestmentStrategy::MostAggressive => (dec!(70), dec!(30), dec!(0), dec!(0)),
        };
        AssetMix::new(d, f, b, s, dec!(0))
    }
}

/// Target mix for a strategy name; unknown names give the zero vector.
pub fn target_allocation(strategy_name: &str) -> AssetMix {
    InvestmentStrategy::from_name(strategy_name)
        .map(InvestmentStrategy::allocation)
        .unwrap_or(AssetMix::ZERO)
}

/// Signed per-class difference `target - current`. Not clamped.
pub fn compare_to_current(target: &AssetMix, current: &AssetMix) -> AssetMix {
    *target - *current
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    /// Canonical strategy name, or `None` when the name was not recognised.
    pub strategy: Option<InvestmentStrategy>,
    pub target: AssetMix,
    pub current: AssetMix,
    pub difference: AssetMix,
}

pub fn compare_strategy(strategy_name: &str, current: &AssetMix) -> StrategyComparison {
    let target = target_allocation(strategy_name);
    StrategyComparison {
        strategy: InvestmentStrategy::from_name(strategy_name),
        target,
        current: *current,
        difference: compare_to_current(&target, current),
    }
}

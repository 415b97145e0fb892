use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentages expressed on a 0-100 scale (asset-class weights).
pub type Percent = Decimal;

/// Round to whole currency units, half away from zero.
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a percentage to one decimal place, half away from zero.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse user-entered numeric text. Anything that is not a number is zero.
///
/// Accepts thousands separators and a leading currency sign
/// (`"$1,250.50"` parses as `1250.50`).
pub fn parse_amount(text: &str) -> Money {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Asset-class weights on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetMix {
    pub domestic: Percent,
    pub foreign: Percent,
    pub bonds: Percent,
    pub short_term: Percent,
    pub other: Percent,
}

impl AssetMix {
    pub const ZERO: AssetMix = AssetMix {
        domestic: Decimal::ZERO,
        foreign: Decimal::ZERO,
        bonds: Decimal::ZERO,
        short_term: Decimal::ZERO,
        other: Decimal::ZERO,
    };

    pub fn new(
        domestic: Percent,
        foreign: Percent,
        bonds: Percent,
        short_term: Percent,
        other: Percent,
    ) -> Self {
        AssetMix {
            domestic,
            foreign,
            bonds,
            short_term,
            other,
        }
    }

    pub fn total(&self) -> Percent {
        self.domestic + self.foreign + self.bonds + self.short_term + self.other
    }

    pub fn is_zero(&self) -> bool {
        *self == AssetMix::ZERO
    }

    pub(crate) fn map(&self, f: impl Fn(Percent) -> Percent) -> AssetMix {
        AssetMix {
            domestic: f(self.domestic),
            foreign: f(self.foreign),
            bonds: f(self.bonds),
            short_term: f(self.short_term),
            other: f(self.other),
        }
    }
}

impl Sub for AssetMix {
    type Output = AssetMix;

    fn sub(self, rhs: AssetMix) -> AssetMix {
        AssetMix {
            domestic: self.domestic - rhs.domestic,
            foreign: self.foreign - rhs.foreign,
            bonds: self.bonds - rhs.bonds,
            short_term: self.short_term - rhs.short_term,
            other: self.other - rhs.other,
        }
    }
}

/// Tax treatment of an account's contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxTreatment {
    TaxDeferred,
    Taxable,
    TaxExempt,
    Hsa,
}

/// Monthly amounts split by tax treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxBreakdown {
    pub tax_deferred: Money,
    pub taxable: Money,
    pub tax_exempt: Money,
    pub hsa: Money,
}

impl TaxBreakdown {
    pub fn total(&self) -> Money {
        self.tax_deferred + self.taxable + self.tax_exempt + self.hsa
    }

    pub fn bucket_mut(&mut self, treatment: TaxTreatment) -> &mut Money {
        match treatment {
            TaxTreatment::TaxDeferred => &mut self.tax_deferred,
            TaxTreatment::Taxable => &mut self.taxable,
            TaxTreatment::TaxExempt => &mut self.tax_exempt,
            TaxTreatment::Hsa => &mut self.hsa,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(dec!(10.5)), dec!(11));
        assert_eq!(round_currency(dec!(11.5)), dec!(12));
        assert_eq!(round_currency(dec!(10.49)), dec!(10));
    }

    #[test]
    fn test_parse_amount_falls_back_to_zero() {
        assert_eq!(parse_amount("1,250.50"), dec!(1250.50));
        assert_eq!(parse_amount(" $300 "), dec!(300));
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn test_asset_mix_subtraction_can_go_negative() {
        let a = AssetMix::new(dec!(10), dec!(0), dec!(0), dec!(0), dec!(0));
        let b = AssetMix::new(dec!(30), dec!(0), dec!(5), dec!(0), dec!(0));
        let diff = a - b;
        assert_eq!(diff.domestic, dec!(-20));
        assert_eq!(diff.bonds, dec!(-5));
    }
}

use planner_core::config::Assumptions;
use planner_core::contribution::{
    allocate_contribution, model_additional_contribution, ContributionModelInput,
};
use planner_core::types::TaxBreakdown;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_future_value_matches_closed_form() {
    // 325/month for ten years at 5.4% / 12.
    let a = Assumptions::default();
    let out = model_additional_contribution(
        &ContributionModelInput {
            monthly_amount: dec!(325),
            current_age: 55,
            retirement_age: 65,
        },
        &a,
    );
    assert_eq!(out.months, 120);

    let r = 0.054_f64 / 12.0;
    let expected = 325.0 * ((1.0 + r).powi(120) - 1.0) / r;
    let actual = out.future_value_of_contributions.to_f64().unwrap();
    assert!((actual - expected).abs() < 1e-6, "{actual} vs {expected}");

    let income = (expected * 0.04 / 12.0).round();
    assert_eq!(out.monthly_income_equivalent.to_f64().unwrap(), income);
}

#[test]
fn test_no_months_means_no_value() {
    let out = model_additional_contribution(
        &ContributionModelInput {
            monthly_amount: dec!(500),
            current_age: 67,
            retirement_age: 67,
        },
        &Assumptions::default(),
    );
    assert_eq!(out.future_value_of_contributions, Decimal::ZERO);
    assert_eq!(out.monthly_income_equivalent, Decimal::ZERO);
}

#[test]
fn test_allocation_preserves_total() {
    let current = TaxBreakdown {
        tax_deferred: dec!(1916.67),
        taxable: dec!(250),
        tax_exempt: dec!(583.33),
        hsa: dec!(320.83),
    };
    for extra in [dec!(0), dec!(1), dec!(325), dec!(10000.55)] {
        let out = allocate_contribution(&current, extra);
        assert_eq!(out.total(), current.total() + extra);
        assert_eq!(out.tax_deferred, current.tax_deferred);
        assert_eq!(out.hsa, current.hsa);
    }
}

#[test]
fn test_retirement_age_far_in_future_is_bounded() {
    let input = ContributionModelInput {
        monthly_amount: dec!(325),
        current_age: 40,
        retirement_age: 2000,
    };
    let est = model_additional_contribution(&input, &Assumptions::default());
    assert_eq!(est.months, 1320);
    assert!(est.future_value_of_contributions > Decimal::ZERO);
    assert!(input.validate().is_err());
}

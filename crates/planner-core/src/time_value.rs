use rust_decimal::Decimal;

use crate::types::{Money, Rate};

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Saturates at `Decimal::MAX` instead of overflowing.
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result = result.saturating_mul(factor);
        if result == Decimal::MAX {
            break;
        }
    }
    result
}

/// Future value of an ordinary annuity: FV = pmt * [((1+r)^n - 1) / r]
///
/// Zero periods give zero. A zero rate degenerates to pmt * n.
pub fn fv_annuity(pmt: Money, rate: Rate, n: u32) -> Money {
    if n == 0 {
        return Decimal::ZERO;
    }
    if rate.is_zero() {
        return pmt.saturating_mul(Decimal::from(n));
    }
    let growth = compound(rate, n) - Decimal::ONE;
    pmt.saturating_mul(growth)
        .checked_div(rate)
        .unwrap_or(if pmt.is_sign_negative() == rate.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

/// One year of growth on a balance, with an optional contribution made
/// at the start of the year. Saturates rather than overflowing.
pub fn grow(balance: Money, contribution: Money, rate: Rate) -> Money {
    balance
        .saturating_add(contribution)
        .saturating_mul(Decimal::ONE + rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_zero_periods_is_one() {
        assert_eq!(compound(dec!(0.07), 0), Decimal::ONE);
    }

    #[test]
    fn test_compound_two_periods() {
        assert_eq!(compound(dec!(0.10), 2), dec!(1.21));
    }

    #[test]
    fn test_fv_annuity_zero_rate() {
        assert_eq!(fv_annuity(dec!(100), Decimal::ZERO, 12), dec!(1200));
    }

    #[test]
    fn test_fv_annuity_textbook() {
        // 100/yr for 3 years at 10%: 100 + 110 + 121 = 331
        assert_eq!(fv_annuity(dec!(100), dec!(0.10), 3), dec!(331));
    }

    #[test]
    fn test_grow_adds_contribution_before_growth() {
        assert_eq!(grow(dec!(1000), dec!(100), dec!(0.10)), dec!(1210));
    }

    #[test]
    fn test_compound_saturates() {
        assert_eq!(compound(dec!(0.5), 10_000), Decimal::MAX);
    }

    #[test]
    fn test_grow_saturates() {
        assert_eq!(grow(Decimal::MAX, dec!(1), dec!(0.075)), Decimal::MAX);
    }

    #[test]
    fn test_fv_annuity_saturates() {
        assert_eq!(fv_annuity(dec!(1000000), dec!(0.0045), 100_000), Decimal::MAX);
    }
}

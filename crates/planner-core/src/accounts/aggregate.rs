use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::household::Household;
use crate::types::{round_percent, AssetMix, Money, Rate, TaxBreakdown, TaxTreatment};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Goal an account is assigned to. Unrecognized goals read as `Unassigned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    Retirement,
    #[default]
    #[serde(other)]
    Unassigned,
}

/// A custodial (built-in) or manually entered (outside) account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u32,
    pub name: String,
    /// Masked account number, e.g. "****4821".
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub goal: Goal,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub balance: Money,
    #[serde(default)]
    pub annual_contribution: Money,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_outside: bool,
    /// Asset-class weights on a 0-100 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<AssetMix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_treatment: Option<TaxTreatment>,
}

/// Per-account row for the goal table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRow {
    pub id: u32,
    pub name: String,
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub owner: String,
    pub value: Money,
    /// Share of the goal total as a fraction (0.25 = 25%).
    pub pct_of_goal: Rate,
    /// Share of the goal total as text with two decimals, e.g. "25.00%".
    pub pct_of_goal_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub total_balance: Money,
    pub total_contributions: Money,
    /// Accounts assigned to the retirement goal.
    pub assigned_count: usize,
    /// Accounts in planning scope, assigned or not.
    pub total_count: usize,
    pub blended_mix: AssetMix,
    pub rows: Vec<AccountRow>,
    /// Partner-owned accounts left out because the plan is single.
    pub excluded_partner_count: usize,
    /// Goal accounts with no asset-class breakdown (their balance dilutes the mix).
    pub missing_breakdown_count: usize,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

fn in_scope<'a>(
    accounts: &'a [Account],
    household: &'a Household,
) -> impl Iterator<Item = &'a Account> + 'a {
    accounts.iter().filter(move |a| {
        household.planning_with_partner || !household.is_partner_owner(&a.owner)
    })
}

fn goal_accounts<'a>(
    accounts: &'a [Account],
    household: &'a Household,
) -> impl Iterator<Item = &'a Account> + 'a {
    in_scope(accounts, household).filter(|a| a.goal == Goal::Retirement)
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Totals, counts, blended asset mix and goal rows for the accounts in scope.
pub fn aggregate(accounts: &[Account], household: &Household) -> AccountSummary {
    let total_count = in_scope(accounts, household).count();
    let excluded_partner_count = accounts.len() - total_count;

    let mut total_balance = Decimal::ZERO;
    let mut total_contributions = Decimal::ZERO;
    let mut assigned_count = 0usize;
    let mut missing_breakdown_count = 0usize;
    let mut weighted = AssetMix::ZERO;

    for account in goal_accounts(accounts, household) {
        assigned_count += 1;
        total_balance += account.balance;
        total_contributions += account.annual_contribution;

        match &account.breakdown {
            Some(mix) => {
                let value = account.balance;
                weighted.domestic += mix.domestic / dec!(100) * value;
                weighted.foreign += mix.foreign / dec!(100) * value;
                weighted.bonds += mix.bonds / dec!(100) * value;
                weighted.short_term += mix.short_term / dec!(100) * value;
                weighted.other += mix.other / dec!(100) * value;
            }
            None => missing_breakdown_count += 1,
        }
    }

    let blended_mix = if total_balance.is_zero() {
        AssetMix::ZERO
    } else {
        weighted.map(|v| round_percent(v / total_balance * dec!(100)))
    };

    let rows = goal_accounts(accounts, household)
        .map(|a| account_row(a, total_balance))
        .collect();

    AccountSummary {
        total_balance,
        total_contributions,
        assigned_count,
        total_count,
        blended_mix,
        rows,
        excluded_partner_count,
        missing_breakdown_count,
    }
}

fn account_row(account: &Account, total_balance: Money) -> AccountRow {
    let pct_of_goal = if total_balance.is_zero() {
        Decimal::ZERO
    } else {
        account.balance / total_balance
    };
    let display = (pct_of_goal * dec!(100))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    AccountRow {
        id: account.id,
        name: account.name.clone(),
        number: account.number.clone(),
        account_type: account.account_type.clone(),
        owner: account.owner.clone(),
        value: account.balance,
        pct_of_goal,
        pct_of_goal_display: format!("{:.2}%", display),
    }
}

// ---------------------------------------------------------------------------
// Tax treatment
// ---------------------------------------------------------------------------

/// Best-effort treatment from a free-text account type label.
pub fn infer_tax_treatment(account_type: &str) -> TaxTreatment {
    let label = account_type.to_ascii_lowercase();
    if label.contains("roth") {
        TaxTreatment::TaxExempt
    } else if label.contains("hsa") || label.contains("health savings") {
        TaxTreatment::Hsa
    } else if ["401", "403", "457", "ira", "sep", "pension"]
        .iter()
        .any(|k| label.contains(k))
    {
        TaxTreatment::TaxDeferred
    } else {
        TaxTreatment::Taxable
    }
}

/// Current monthly contributions of the goal accounts, split by tax treatment.
pub fn contribution_breakdown(accounts: &[Account], household: &Household) -> TaxBreakdown {
    let mut breakdown = TaxBreakdown::default();
    for account in goal_accounts(accounts, household) {
        let treatment = account
            .tax_treatment
            .unwrap_or_else(|| infer_tax_treatment(&account.account_type));
        *breakdown.bucket_mut(treatment) += account.annual_contribution / dec!(12);
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn account(id: u32, goal: Goal, owner: &str, balance: Money) -> Account {
        Account {
            id,
            name: format!("Account {id}"),
            number: format!("****{id:04}"),
            goal,
            account_type: "401(k)".into(),
            owner: owner.into(),
            balance,
            annual_contribution: dec!(1200),
            is_outside: false,
            breakdown: None,
            tax_treatment: None,
        }
    }

    fn single() -> Household {
        let mut hh = Household::default();
        hh.primary.name = "Alex".into();
        hh.partner.name = "Sam".into();
        hh
    }

    #[test]
    fn test_goal_filter_and_blended_mix() {
        let mut retirement = account(1, Goal::Retirement, "Alex", dec!(100000));
        retirement.breakdown = Some(AssetMix::new(
            dec!(100),
            dec!(0),
            dec!(0),
            dec!(0),
            dec!(0),
        ));
        let unassigned = account(2, Goal::Unassigned, "Alex", dec!(50000));

        let s = aggregate(&[retirement, unassigned], &single());
        assert_eq!(s.total_balance, dec!(100000));
        assert_eq!(s.assigned_count, 1);
        assert_eq!(s.total_count, 2);
        assert_eq!(
            s.blended_mix,
            AssetMix::new(dec!(100), dec!(0), dec!(0), dec!(0), dec!(0))
        );
    }

    #[test]
    fn test_weighted_mix_rounds_to_one_decimal() {
        let mut a = account(1, Goal::Retirement, "Alex", dec!(200));
        a.breakdown = Some(AssetMix::new(dec!(60), dec!(40), dec!(0), dec!(0), dec!(0)));
        let mut b = account(2, Goal::Retirement, "Alex", dec!(100));
        b.breakdown = Some(AssetMix::new(dec!(0), dec!(0), dec!(100), dec!(0), dec!(0)));

        let mix = aggregate(&[a, b], &single()).blended_mix;
        // domestic 120/300 = 40.0, foreign 80/300 = 26.67 -> 26.7, bonds 100/300 -> 33.3
        assert_eq!(mix.domestic, dec!(40.0));
        assert_eq!(mix.foreign, dec!(26.7));
        assert_eq!(mix.bonds, dec!(33.3));
    }

    #[test]
    fn test_zero_balance_gives_zero_mix() {
        let mut a = account(1, Goal::Retirement, "Alex", Decimal::ZERO);
        a.breakdown = Some(AssetMix::new(dec!(50), dec!(50), dec!(0), dec!(0), dec!(0)));
        let s = aggregate(&[a], &single());
        assert!(s.blended_mix.is_zero());
        assert_eq!(s.rows[0].pct_of_goal, Decimal::ZERO);
        assert_eq!(s.rows[0].pct_of_goal_display, "0.00%");
    }

    #[test]
    fn test_partner_accounts_excluded_when_single() {
        let mine = account(1, Goal::Retirement, "Alex", dec!(1000));
        let theirs = account(2, Goal::Retirement, "Sam", dec!(9000));
        let mut hh = single();

        let s = aggregate(&[mine.clone(), theirs.clone()], &hh);
        assert_eq!(s.total_balance, dec!(1000));
        assert_eq!(s.total_count, 1);
        assert_eq!(s.excluded_partner_count, 1);

        hh.planning_with_partner = true;
        let s = aggregate(&[mine, theirs], &hh);
        assert_eq!(s.total_balance, dec!(10000));
        assert_eq!(s.total_count, 2);
    }

    #[test]
    fn test_unknown_goal_reads_as_unassigned() {
        let a: Account = serde_json::from_str(
            r#"{"id": 7, "name": "College fund", "goal": "EDUCATION", "balance": "5000"}"#,
        )
        .unwrap();
        assert_eq!(a.goal, Goal::Unassigned);
        assert_eq!(aggregate(&[a], &single()).total_balance, Decimal::ZERO);
    }

    #[test]
    fn test_row_percentages() {
        let a = account(1, Goal::Retirement, "Alex", dec!(200));
        let b = account(2, Goal::Retirement, "Alex", dec!(100));
        let s = aggregate(&[a, b], &single());
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.rows[0].pct_of_goal_display, "66.67%");
        assert_eq!(s.rows[1].pct_of_goal_display, "33.33%");
        assert_eq!(s.missing_breakdown_count, 2);
    }

    #[test]
    fn test_infer_tax_treatment() {
        assert_eq!(infer_tax_treatment("Roth IRA"), TaxTreatment::TaxExempt);
        assert_eq!(infer_tax_treatment("Traditional IRA"), TaxTreatment::TaxDeferred);
        assert_eq!(infer_tax_treatment("401(k)"), TaxTreatment::TaxDeferred);
        assert_eq!(infer_tax_treatment("HSA"), TaxTreatment::Hsa);
        assert_eq!(infer_tax_treatment("Brokerage"), TaxTreatment::Taxable);
    }

    #[test]
    fn test_contribution_breakdown_uses_override() {
        let a = account(1, Goal::Retirement, "Alex", dec!(100));
        let mut b = account(2, Goal::Retirement, "Alex", dec!(100));
        b.tax_treatment = Some(TaxTreatment::Hsa);
        let c = account(3, Goal::Unassigned, "Alex", dec!(100));

        let tb = contribution_breakdown(&[a, b, c], &single());
        assert_eq!(tb.tax_deferred, dec!(100));
        assert_eq!(tb.hsa, dec!(100));
        assert_eq!(tb.total(), dec!(200));
    }
}

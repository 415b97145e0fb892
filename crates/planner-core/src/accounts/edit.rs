//! Draft edits for accounts.
//!
//! A draft is opened from an account, edited freely as text, and merged into
//! the document only on commit. Built-in accounts expose goal and contribution;
//! outside accounts expose every descriptive field as well. The variant chosen
//! at `begin` decides which fields exist.

use serde::{Deserialize, Serialize};

use super::aggregate::{Account, Goal};
use crate::error::PlannerError;
use crate::types::{parse_amount, AssetMix, Money, TaxTreatment};
use crate::PlannerResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltInAccountDraft {
    pub account_id: u32,
    pub goal: Goal,
    /// Annual contribution as entered.
    pub contribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutsideAccountDraft {
    pub account_id: u32,
    pub name: String,
    pub number: String,
    pub account_type: String,
    pub owner: String,
    /// Balance as entered.
    pub balance: String,
    pub goal: Goal,
    /// Annual contribution as entered.
    pub contribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AccountEdit {
    BuiltIn(BuiltInAccountDraft),
    Outside(OutsideAccountDraft),
}

impl AccountEdit {
    /// Open a draft with the fields this account allows to change.
    pub fn begin(account: &Account) -> AccountEdit {
        if account.is_outside {
            AccountEdit::Outside(OutsideAccountDraft {
                account_id: account.id,
                name: account.name.clone(),
                number: account.number.clone(),
                account_type: account.account_type.clone(),
                owner: account.owner.clone(),
                balance: account.balance.to_string(),
                goal: account.goal,
                contribution: account.annual_contribution.to_string(),
            })
        } else {
            AccountEdit::BuiltIn(BuiltInAccountDraft {
                account_id: account.id,
                goal: account.goal,
                contribution: account.annual_contribution.to_string(),
            })
        }
    }

    pub fn account_id(&self) -> u32 {
        match self {
            AccountEdit::BuiltIn(d) => d.account_id,
            AccountEdit::Outside(d) => d.account_id,
        }
    }

    /// Produce the edited account. The input account is left untouched.
    pub fn apply(&self, account: &Account) -> PlannerResult<Account> {
        if account.id != self.account_id() {
            return Err(PlannerError::InvalidInput {
                field: "account_id".into(),
                reason: format!(
                    "draft for account {} applied to account {}",
                    self.account_id(),
                    account.id
                ),
            });
        }

        let mut next = account.clone();
        match self {
            AccountEdit::BuiltIn(d) => {
                next.goal = d.goal;
                next.annual_contribution = parse_amount(&d.contribution);
            }
            AccountEdit::Outside(d) => {
                if !account.is_outside {
                    return Err(PlannerError::EditNotPermitted {
                        account_id: account.id,
                        reason: "only goal and contribution can change on a built-in account"
                            .into(),
                    });
                }
                next.name = d.name.trim().to_string();
                next.number = d.number.trim().to_string();
                next.account_type = d.account_type.trim().to_string();
                next.owner = d.owner.trim().to_string();
                next.balance = parse_amount(&d.balance);
                next.goal = d.goal;
                next.annual_contribution = parse_amount(&d.contribution);
            }
        }
        Ok(next)
    }
}

/// A manually entered account, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewOutsideAccount {
    pub name: String,
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub owner: String,
    pub balance: Money,
    pub annual_contribution: Money,
    pub goal: Goal,
    pub breakdown: Option<AssetMix>,
    pub tax_treatment: Option<TaxTreatment>,
}

impl NewOutsideAccount {
    pub fn into_account(self, id: u32) -> Account {
        Account {
            id,
            name: self.name,
            number: self.number,
            goal: self.goal,
            account_type: self.account_type,
            owner: self.owner,
            balance: self.balance,
            annual_contribution: self.annual_contribution,
            is_outside: true,
            breakdown: self.breakdown,
            tax_treatment: self.tax_treatment,
        }
    }
}

/// Next id: one past the largest in use, 1 for an empty list. `None` once
/// `u32::MAX` is taken.
pub fn next_account_id(accounts: &[Account]) -> Option<u32> {
    match accounts.iter().map(|a| a.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn built_in() -> Account {
        Account {
            id: 3,
            name: "Workplace 401(k)".into(),
            number: "****1234".into(),
            goal: Goal::Unassigned,
            account_type: "401(k)".into(),
            owner: "Alex".into(),
            balance: dec!(1000),
            annual_contribution: dec!(600),
            is_outside: false,
            breakdown: None,
            tax_treatment: None,
        }
    }

    #[test]
    fn test_built_in_gets_built_in_draft() {
        let edit = AccountEdit::begin(&built_in());
        assert!(matches!(edit, AccountEdit::BuiltIn(_)));
        assert_eq!(edit.account_id(), 3);
    }

    #[test]
    fn test_built_in_draft_changes_goal_and_contribution_only() {
        let account = built_in();
        let edit = AccountEdit::BuiltIn(BuiltInAccountDraft {
            account_id: 3,
            goal: Goal::Retirement,
            contribution: "2,400".into(),
        });
        let next = edit.apply(&account).unwrap();
        assert_eq!(next.goal, Goal::Retirement);
        assert_eq!(next.annual_contribution, dec!(2400));
        assert_eq!(next.balance, account.balance);
        assert_eq!(next.name, account.name);
    }

    #[test]
    fn test_outside_draft_rejected_on_built_in() {
        let account = built_in();
        let edit = AccountEdit::Outside(OutsideAccountDraft {
            account_id: 3,
            name: "Renamed".into(),
            number: String::new(),
            account_type: String::new(),
            owner: String::new(),
            balance: "5".into(),
            goal: Goal::Retirement,
            contribution: "0".into(),
        });
        assert!(matches!(
            edit.apply(&account),
            Err(PlannerError::EditNotPermitted { account_id: 3, .. })
        ));
    }

    #[test]
    fn test_outside_draft_bad_numbers_become_zero() {
        let mut account = built_in();
        account.is_outside = true;
        let AccountEdit::Outside(mut draft) = AccountEdit::begin(&account) else {
            panic!("expected outside draft");
        };
        draft.name = " Old brokerage ".into();
        draft.balance = "lots".into();
        let next = AccountEdit::Outside(draft).apply(&account).unwrap();
        assert_eq!(next.name, "Old brokerage");
        assert_eq!(next.balance, Decimal::ZERO);
        assert_eq!(next.annual_contribution, dec!(600));
    }

    #[test]
    fn test_draft_for_other_account_rejected() {
        let edit = AccountEdit::begin(&built_in());
        let mut other = built_in();
        other.id = 9;
        assert!(edit.apply(&other).is_err());
    }

    #[test]
    fn test_next_account_id() {
        assert_eq!(next_account_id(&[]), Some(1));
        let mut a = built_in();
        let mut b = built_in();
        a.id = 4;
        b.id = 11;
        assert_eq!(next_account_id(&[a, b]), Some(12));
    }

    #[test]
    fn test_next_account_id_exhausted() {
        let mut a = built_in();
        a.id = u32::MAX;
        assert_eq!(next_account_id(&[a]), None);
    }
}

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, Goal};
use crate::expenses::{ExpenseMethod, ExpensePlan, LifestyleTier, MonthlySplit};
use crate::household::{Household, Person, RetirementProfile};
use crate::income::{IncomeSources, SocialSecurity};
use crate::types::AssetMix;
use crate::PlannerResult;

/// Key the whole document is stored under.
pub const STORAGE_KEY: &str = "retirementPlannerState";

/// The single application document. Every edit replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDocument {
    pub household: Household,
    pub profile: RetirementProfile,
    pub expenses: ExpensePlan,
    pub accounts: Vec<Account>,
    pub income: IncomeSources,
    pub modeled_strategy: Option<String>,
}

impl Default for PlanDocument {
    fn default() -> Self {
        PlanDocument::seed()
    }
}

impl PlanDocument {
    pub fn from_json(json: &str) -> PlannerResult<PlanDocument> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn account(&self, id: u32) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Document used on first start and whenever the stored one is unreadable.
    pub fn seed() -> PlanDocument {
        let owner = "Alex Morgan";
        let partner = "Sam Morgan";

        PlanDocument {
            household: Household {
                primary: Person {
                    name: owner.into(),
                    date_of_birth: "1985-04-12".into(),
                    annual_income: dec!(145000),
                    annual_bonus: dec!(12000),
                },
                partner: Person {
                    name: partner.into(),
                    date_of_birth: "1987-09-30".into(),
                    annual_income: dec!(98000),
                    annual_bonus: dec!(5000),
                },
                planning_with_partner: false,
            },
            profile: RetirementProfile {
                retirement_age: 67,
                partner_retirement_age: 65,
                plan_to_age: 95,
                state: "CA".into(),
            },
            expenses: ExpensePlan {
                method: ExpenseMethod::Monthly,
                lifestyle: Some(LifestyleTier::Average),
                monthly: MonthlySplit {
                    essential: dec!(10666),
                    non_essential: dec!(2666),
                },
                itemized: Default::default(),
            },
            accounts: seed_accounts(owner, partner),
            income: IncomeSources {
                social_security: SocialSecurity {
                    monthly_amount: dec!(2850),
                    start_age: 67,
                    enabled: true,
                },
                ..Default::default()
            },
            modeled_strategy: None,
        }
    }
}

fn seed_accounts(owner: &str, partner: &str) -> Vec<Account> {
    [
        (1u32, "Workplace 401(k)", "****4821", Goal::Retirement, "401(k)", owner,
            dec!(312500), dec!(23000), [dec!(55), dec!(20), dec!(20), dec!(5)]),
        (2, "Roth IRA", "****7730", Goal::Retirement, "Roth IRA", owner,
            dec!(84200), dec!(7000), [dec!(70), dec!(30), dec!(0), dec!(0)]),
        (3, "Individual brokerage", "****1902", Goal::Unassigned, "Brokerage", owner,
            dec!(46750), dec!(0), [dec!(80), dec!(10), dec!(0), dec!(10)]),
        (4, "Partner 403(b)", "****5567", Goal::Retirement, "403(b)", partner,
            dec!(128900), dec!(12000), [dec!(40), dec!(15), dec!(35), dec!(10)]),
        (5, "Health savings", "****3348", Goal::Unassigned, "HSA", owner,
            dec!(9800), dec!(3850), [dec!(0), dec!(0), dec!(0), dec!(100)]),
    ]
    .into_iter()
    .map(
        |(id, name, number, goal, kind, owner, balance, contribution, [d, f, b, s])| Account {
            id,
            name: name.into(),
            number: number.into(),
            goal,
            account_type: kind.into(),
            owner: owner.into(),
            balance,
            annual_contribution: contribution,
            is_outside: false,
            breakdown: Some(AssetMix::new(d, f, b, s, dec!(0))),
            tax_treatment: None,
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_round_trips_through_json() {
        let seed = PlanDocument::seed();
        let json = seed.to_json().unwrap();
        assert_eq!(PlanDocument::from_json(&json).unwrap(), seed);
    }

    #[test]
    fn test_document_uses_camel_case_fields() {
        let json = PlanDocument::seed().to_json().unwrap();
        assert!(json.contains("\"planningWithPartner\""));
        assert!(json.contains("\"nonEssential\""));
        assert!(json.contains("\"annualContribution\""));
        assert!(json.contains("\"goal\":\"RETIREMENT\""));
        assert!(json.contains("\"modeledStrategy\""));
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let doc = PlanDocument::from_json(r#"{"accounts": []}"#).unwrap();
        assert!(doc.accounts.is_empty());
        assert_eq!(doc.profile.plan_to_age, 95);
    }

    #[test]
    fn test_seed_accounts_are_built_in() {
        assert!(PlanDocument::seed().accounts.iter().all(|a| !a.is_outside));
    }
}

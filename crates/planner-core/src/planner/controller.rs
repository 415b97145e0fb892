//! Application controller over a persisted [`PlanDocument`].
//!
//! Every mutation builds a new document, persists it, then swaps it in.
//! A failed write leaves the in-memory document unchanged. The asset
//! projection is cached against its inputs and only recomputed when one of
//! them differs; [`Planner::analysis`] reads from the same cache.

use rust_decimal::Decimal;

use super::analysis::{analyze_with_projection, asset_projection_input, PlanAnalysis};
use super::document::{PlanDocument, STORAGE_KEY};
use super::store::DocumentStore;
use crate::accounts::{next_account_id, AccountEdit, NewOutsideAccount};
use crate::config::Assumptions;
use crate::error::PlannerError;
use crate::expenses::{ExpenseCategory, ExpenseMethod, LifestyleTier, MonthlySplit};
use crate::household::{Household, RetirementProfile};
use crate::income::IncomeSources;
use crate::projection::{project_assets, AssetProjectionInput, ProjectionPoint};
use crate::types::Money;
use crate::PlannerResult;

#[derive(Debug, Clone)]
struct ProjectionMemo {
    input: AssetProjectionInput,
    series: Vec<ProjectionPoint>,
}

pub struct Planner<S: DocumentStore> {
    store: S,
    assumptions: Assumptions,
    document: PlanDocument,
    memo: Option<ProjectionMemo>,
    recomputations: u64,
}

impl<S: DocumentStore> Planner<S> {
    /// Load the stored document, falling back to the seed document when
    /// nothing is stored or the stored value cannot be read.
    pub fn load(store: S, assumptions: Assumptions) -> Planner<S> {
        let document = match store.read(STORAGE_KEY) {
            Ok(Some(json)) => match PlanDocument::from_json(&json) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(error = %e, "stored plan is unreadable, starting from seed");
                    PlanDocument::seed()
                }
            },
            Ok(None) => {
                tracing::debug!("no stored plan, starting from seed");
                PlanDocument::seed()
            }
            Err(e) => {
                tracing::warn!(error = %e, "plan store read failed, starting from seed");
                PlanDocument::seed()
            }
        };

        Planner {
            store,
            assumptions,
            document,
            memo: None,
            recomputations: 0,
        }
    }

    pub fn document(&self) -> &PlanDocument {
        &self.document
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Number of times the asset projection has actually been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Persist `next` and make it current.
    fn replace(&mut self, next: PlanDocument) -> PlannerResult<()> {
        let json = next.to_json()?;
        self.store.write(STORAGE_KEY, &json)?;
        tracing::debug!(bytes = json.len(), "plan saved");
        self.document = next;
        Ok(())
    }

    fn update(&mut self, edit: impl FnOnce(&mut PlanDocument)) -> PlannerResult<()> {
        let mut next = self.document.clone();
        edit(&mut next);
        self.replace(next)
    }

    /// Discard the current plan and store the seed document.
    pub fn reset(&mut self) -> PlannerResult<()> {
        self.replace(PlanDocument::seed())
    }

    // -- household and profile ---------------------------------------------

    pub fn set_household(&mut self, household: Household) -> PlannerResult<()> {
        self.update(|doc| doc.household = household)
    }

    pub fn set_profile(&mut self, profile: RetirementProfile) -> PlannerResult<()> {
        self.update(|doc| doc.profile = profile)
    }

    // -- expenses ------------------------------------------------------------

    pub fn select_expense_method(&mut self, method: ExpenseMethod) -> PlannerResult<()> {
        self.update(|doc| doc.expenses.method = method)
    }

    pub fn set_lifestyle(&mut self, tier: LifestyleTier) -> PlannerResult<()> {
        self.update(|doc| doc.expenses.lifestyle = Some(tier))
    }

    pub fn set_monthly_expenses(&mut self, split: MonthlySplit) -> PlannerResult<()> {
        self.update(|doc| doc.expenses.monthly = split)
    }

    pub fn set_itemized_expense(
        &mut self,
        category: ExpenseCategory,
        amount: Money,
    ) -> PlannerResult<()> {
        if amount < Decimal::ZERO {
            return Err(PlannerError::InvalidInput {
                field: "amount".into(),
                reason: "itemized expense cannot be negative".into(),
            });
        }
        self.update(|doc| {
            doc.expenses.itemized.insert(category, amount);
        })
    }

    // -- income and strategy -------------------------------------------------

    pub fn set_income(&mut self, income: IncomeSources) -> PlannerResult<()> {
        self.update(|doc| doc.income = income)
    }

    /// Record the strategy being modeled; `None` clears it.
    pub fn set_modeled_strategy(&mut self, name: Option<String>) -> PlannerResult<()> {
        self.update(|doc| doc.modeled_strategy = name)
    }

    // -- accounts ------------------------------------------------------------

    /// Add a manually entered account and return its id.
    pub fn add_outside_account(&mut self, account: NewOutsideAccount) -> PlannerResult<u32> {
        if account.name.trim().is_empty() {
            return Err(PlannerError::InvalidInput {
                field: "name".into(),
                reason: "account name is required".into(),
            });
        }
        let id = next_account_id(&self.document.accounts).ok_or_else(|| {
            PlannerError::InvalidInput {
                field: "id".into(),
                reason: "no account ids left".into(),
            }
        })?;
        self.update(|doc| doc.accounts.push(account.into_account(id)))?;
        tracing::info!(account_id = id, "outside account added");
        Ok(id)
    }

    /// Open a draft for the account, or `None` when the id is unknown.
    pub fn begin_account_edit(&self, account_id: u32) -> Option<AccountEdit> {
        self.document.account(account_id).map(AccountEdit::begin)
    }

    /// Merge a draft into the document.
    pub fn commit_account_edit(&mut self, edit: &AccountEdit) -> PlannerResult<()> {
        let id = edit.account_id();
        let current = self
            .document
            .account(id)
            .ok_or(PlannerError::UnknownAccount(id))?;
        let edited = edit.apply(current)?;

        let mut next = self.document.clone();
        if let Some(slot) = next.accounts.iter_mut().find(|a| a.id == id) {
            *slot = edited;
        }
        self.replace(next)
    }

    // -- derived views -------------------------------------------------------

    /// Asset projection for the current document, recomputed only when its
    /// inputs changed since the last call.
    pub fn projection(&mut self) -> &[ProjectionPoint] {
        let input = asset_projection_input(&self.document, &self.assumptions);
        let stale = self.memo.as_ref().map_or(true, |m| m.input != input);
        if stale {
            let series = project_assets(&input, &self.assumptions);
            self.recomputations += 1;
            tracing::trace!(rows = series.len(), "asset projection recomputed");
            self.memo = Some(ProjectionMemo { input, series });
        }
        match &self.memo {
            Some(memo) => &memo.series,
            None => &[],
        }
    }

    /// Full analysis of the current document, reusing the cached projection.
    pub fn analysis(&mut self, seed: Option<u64>) -> PlanAnalysis {
        let projection = self.projection().to_vec();
        analyze_with_projection(&self.document, &self.assumptions, seed, projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Goal;
    use crate::planner::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn planner() -> Planner<MemoryStore> {
        Planner::load(MemoryStore::new(), Assumptions::default())
    }

    #[test]
    fn test_missing_document_uses_seed() {
        let p = planner();
        assert_eq!(p.document(), &PlanDocument::seed());
    }

    #[test]
    fn test_corrupt_document_uses_seed() {
        let store = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        let p = Planner::load(store, Assumptions::default());
        assert_eq!(p.document(), &PlanDocument::seed());
    }

    #[test]
    fn test_mutation_is_persisted() {
        let mut p = planner();
        p.set_monthly_expenses(MonthlySplit {
            essential: dec!(5000),
            non_essential: dec!(1000),
        })
        .unwrap();

        let stored = p.store().get(STORAGE_KEY).unwrap();
        let reloaded = PlanDocument::from_json(stored).unwrap();
        assert_eq!(reloaded.expenses.monthly.essential, dec!(5000));
        assert_eq!(&reloaded, p.document());
    }

    #[test]
    fn test_projection_memoized_until_inputs_change() {
        let mut p = planner();
        let first = p.projection().to_vec();
        let _ = p.projection();
        assert_eq!(p.recomputations(), 1);

        // Expenses do not feed the asset projection.
        p.select_expense_method(ExpenseMethod::Lifestyle).unwrap();
        assert_eq!(p.projection(), first.as_slice());
        assert_eq!(p.recomputations(), 1);

        let edit = match p.begin_account_edit(1).unwrap() {
            AccountEdit::BuiltIn(mut d) => {
                d.contribution = "30000".into();
                AccountEdit::BuiltIn(d)
            }
            other => panic!("unexpected draft {other:?}"),
        };
        p.commit_account_edit(&edit).unwrap();
        assert_ne!(p.projection(), first.as_slice());
        assert_eq!(p.recomputations(), 2);
    }

    #[test]
    fn test_analysis_reuses_cached_projection() {
        let mut p = planner();
        let series = p.projection().to_vec();
        let out = p.analysis(Some(42));
        assert_eq!(p.recomputations(), 1);
        assert_eq!(out.projection, series);
        assert_eq!(out, crate::planner::analyze(p.document(), p.assumptions(), Some(42)));
    }

    #[test]
    fn test_add_outside_account_fails_when_ids_exhausted() {
        let mut p = planner();
        let mut doc = p.document().clone();
        doc.accounts[0].id = u32::MAX;
        p.replace(doc).unwrap();
        let before = p.document().clone();

        let result = p.add_outside_account(NewOutsideAccount {
            name: "One too many".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(PlannerError::InvalidInput { .. })));
        assert_eq!(p.document(), &before);
    }

    #[test]
    fn test_add_outside_account_assigns_next_id() {
        let mut p = planner();
        let id = p
            .add_outside_account(NewOutsideAccount {
                name: "Old employer plan".into(),
                goal: Goal::Retirement,
                balance: dec!(15000),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(id, 6);
        assert!(p.document().account(6).unwrap().is_outside);
    }

    #[test]
    fn test_unknown_account_edit_rejected() {
        let mut p = planner();
        let mut edit = p.begin_account_edit(1).unwrap();
        if let AccountEdit::BuiltIn(d) = &mut edit {
            d.account_id = 99;
        }
        assert!(matches!(
            p.commit_account_edit(&edit),
            Err(PlannerError::UnknownAccount(99))
        ));
    }

    #[test]
    fn test_negative_itemized_rejected_without_change() {
        let mut p = planner();
        let before = p.document().clone();
        assert!(p
            .set_itemized_expense(ExpenseCategory::Housing, dec!(-1))
            .is_err());
        assert_eq!(p.document(), &before);
    }
}

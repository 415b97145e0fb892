pub mod aggregate;
pub mod edit;

pub use aggregate::{
    aggregate, contribution_breakdown, infer_tax_treatment, Account, AccountRow, AccountSummary,
    Goal,
};
pub use edit::{
    next_account_id, AccountEdit, BuiltInAccountDraft, NewOutsideAccount, OutsideAccountDraft,
};

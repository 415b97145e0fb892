pub mod summary;

pub use summary::{
    summarize, ExpenseCategory, ExpenseMethod, ExpensePlan, ExpenseSummary, LifestyleTier,
    MonthlySplit,
};

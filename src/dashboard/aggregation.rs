//! Budget progress and income/expense totals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Amount;

/// How much of a category's monthly budget has been spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    pub category: String,
    /// The amount spent in the category this month.
    pub spent: Amount,
    /// The monthly budget, zero if the category has no budget.
    pub budget: Amount,
    /// `raw_percent` capped at 100, e.g. for the width of a progress bar.
    pub capped_percent: i64,
    /// The percentage of the budget that has been spent, which may exceed 100.
    pub raw_percent: i64,
}

/// Calculate the percentage of `budget` that `spent` represents, as `(capped, raw)`.
///
/// Percentages are rounded to the nearest integer, with ties going to the even integer.
/// Both are zero when the budget is not positive.
pub(super) fn budget_percentages(spent: Amount, budget: Amount) -> (i64, i64) {
    if !budget.is_positive() {
        return (0, 0);
    }

    let raw = (spent.as_f64() / budget.as_f64() * 100.0).round_ties_even() as i64;

    (raw.min(100), raw)
}

/// Merge a month's spending and the user's budgets into one entry per category.
///
/// Entries follow the order of `categories`. Categories missing from `spent` or `budgets` count
/// as zero.
pub fn calculate_budget_progress(
    categories: &[String],
    spent: &BTreeMap<String, Amount>,
    budgets: &BTreeMap<String, Amount>,
) -> Vec<BudgetProgress> {
    categories
        .iter()
        .map(|category| {
            let spent = spent.get(category).copied().unwrap_or_default();
            let budget = budgets.get(category).copied().unwrap_or_default();
            let (capped_percent, raw_percent) = budget_percentages(spent, budget);

            BudgetProgress {
                category: category.clone(),
                spent,
                budget,
                capped_percent,
                raw_percent,
            }
        })
        .collect()
}

/// Income and expense totals over some period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    /// Income minus expense.
    pub balance: Amount,
}

impl Totals {
    pub fn new(income: Amount, expense: Amount) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

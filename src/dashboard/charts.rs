//! Chart series for the reports page.
//!
//! The series are plain labels and values, styling is left to the client:
//! - **Daily flow**: expense and income totals for each day of a month
//! - **Categories**: a month's spending per category, largest first
//! - **Annual flow**: expense and income totals for each month of a year

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Amount, UserID,
    calendar::{Language, Period, short_month_names},
    dashboard::summary::or_default,
    transaction::{
        DailyTotals, TransactionType, sum_by_category_for_period, sum_by_day_for_period,
        sum_by_month_for_year,
    },
};

/// Daily expense and income series, labelled "01", "02" and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyFlowChart {
    pub labels: Vec<String>,
    pub expense: Vec<Amount>,
    pub income: Vec<Amount>,
}

impl From<DailyTotals> for DailyFlowChart {
    fn from(totals: DailyTotals) -> Self {
        let labels = (1..=totals.expense.len())
            .map(|day| format!("{day:02}"))
            .collect();

        Self {
            labels,
            expense: totals.expense,
            income: totals.income,
        }
    }
}

/// Spending per category.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChart {
    pub labels: Vec<String>,
    pub values: Vec<Amount>,
}

impl From<BTreeMap<String, Amount>> for CategoryChart {
    fn from(totals: BTreeMap<String, Amount>) -> Self {
        let mut entries: Vec<_> = totals.into_iter().collect();
        entries.sort_by(|(a_name, a_total), (b_name, b_total)| {
            b_total.cmp(a_total).then_with(|| a_name.cmp(b_name))
        });

        let (labels, values) = entries.into_iter().unzip();

        Self { labels, values }
    }
}

/// Monthly expense and income series, labelled with short month names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualFlowChart {
    pub labels: [&'static str; 12],
    pub expense: [Amount; 12],
    pub income: [Amount; 12],
}

/// The user's daily flow for `period`, all zeros if the query fails.
pub fn daily_flow_chart(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> DailyFlowChart {
    let totals = sum_by_day_for_period(user_id, period, connection).unwrap_or_else(|error| {
        tracing::error!("could not load daily flow: {error}");
        DailyTotals::zeros(period)
    });

    totals.into()
}

/// The user's spending by category for `period`, empty if the query fails.
pub fn category_chart(user_id: UserID, period: Period, connection: &Connection) -> CategoryChart {
    or_default(
        sum_by_category_for_period(user_id, period, connection),
        "category totals",
    )
    .into()
}

/// The user's monthly flow for `year`.
///
/// A series that fails to load is all zeros.
pub fn annual_flow_chart(
    user_id: UserID,
    year: i32,
    language: Language,
    connection: &Connection,
) -> AnnualFlowChart {
    AnnualFlowChart {
        labels: short_month_names(language),
        expense: or_default(
            sum_by_month_for_year(user_id, year, TransactionType::Expense, connection),
            "annual expenses",
        ),
        income: or_default(
            sum_by_month_for_year(user_id, year, TransactionType::Income, connection),
            "annual income",
        ),
    }
}

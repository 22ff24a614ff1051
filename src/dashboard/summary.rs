//! The dashboard and reports view-models.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error, UserID,
    budget::get_budgets,
    calendar::{Language, MonthOption, Period, iso_date, month_names, month_options, year_options},
    category::get_category_names,
    dashboard::aggregation::{BudgetProgress, Totals, calculate_budget_progress},
    transaction::{
        Transaction, TransactionFilter, TransactionType, list_for_period,
        sum_by_category_for_period, sum_by_type,
    },
};

/// Log a failed reporting query and fall back to an empty section.
pub(super) fn or_default<T: Default>(result: Result<T, Error>, section: &str) -> T {
    result.unwrap_or_else(|error| {
        tracing::error!("could not load {section}: {error}");
        T::default()
    })
}

/// The month a view covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodView {
    pub year: i32,
    /// The month number, 1 for January.
    pub month: u8,
    pub month_name: &'static str,
    #[serde(with = "iso_date")]
    pub first_day: Date,
    #[serde(with = "iso_date")]
    pub last_day: Date,
}

impl PeriodView {
    pub fn new(period: Period, language: Language) -> Self {
        let month = u8::from(period.month());

        Self {
            year: period.year(),
            month,
            month_name: month_names(language)[usize::from(month) - 1],
            first_day: period.first_day(),
            last_day: period.last_day(),
        }
    }
}

/// Everything the dashboard page shows for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub period: PeriodView,
    /// The month's transactions, newest first.
    pub transactions: Vec<Transaction>,
    pub monthly_totals: Totals,
    /// Totals over all of the user's transactions.
    pub historical_totals: Totals,
    pub budget_progress: Vec<BudgetProgress>,
    /// The date the new transaction form starts with.
    #[serde(with = "iso_date")]
    pub default_form_date: Date,
    pub month_options: Vec<MonthOption>,
    pub year_options: Vec<i32>,
}

/// The period selector for the reports page.
///
/// The charts themselves are fetched from the chart data endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportsView {
    pub period: PeriodView,
    pub month_options: Vec<MonthOption>,
    pub year_options: Vec<i32>,
}

impl ReportsView {
    pub fn new(period: Period, today: Date, language: Language) -> Self {
        Self {
            period: PeriodView::new(period, language),
            month_options: month_options(language),
            year_options: year_options(today),
        }
    }
}

/// Today if `period` is the current month, otherwise the first day of `period`.
pub fn default_form_date(period: Period, today: Date) -> Date {
    if period.contains(today) {
        today
    } else {
        period.first_day()
    }
}

/// Get the user's spending against each of their categories' budgets for `period`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the underlying queries fail.
pub fn get_budget_progress(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<Vec<BudgetProgress>, Error> {
    let categories = get_category_names(user_id, connection)?;
    let spent = sum_by_category_for_period(user_id, period, connection)?;
    let budgets = get_budgets(user_id, connection)?;

    Ok(calculate_budget_progress(&categories, &spent, &budgets))
}

/// Sum the user's income and expenses in `filter`.
pub fn get_totals(filter: TransactionFilter, connection: &Connection) -> Result<Totals, Error> {
    let income = sum_by_type(filter.transaction_type(TransactionType::Income), connection)?;
    let expense = sum_by_type(filter.transaction_type(TransactionType::Expense), connection)?;

    Ok(Totals::new(income, expense))
}

/// Build the dashboard for `period`.
///
/// Each section that fails to load is logged and left empty so that the rest of the dashboard
/// can still be shown.
pub fn build_dashboard_view(
    user_id: UserID,
    period: Period,
    today: Date,
    language: Language,
    connection: &Connection,
) -> DashboardView {
    let filter = TransactionFilter::new(user_id);

    DashboardView {
        period: PeriodView::new(period, language),
        transactions: or_default(list_for_period(user_id, period, connection), "transactions"),
        monthly_totals: or_default(get_totals(filter.window(period), connection), "monthly totals"),
        historical_totals: or_default(get_totals(filter, connection), "historical totals"),
        budget_progress: or_default(
            get_budget_progress(user_id, period, connection),
            "budget progress",
        ),
        default_form_date: default_form_date(period, today),
        month_options: month_options(language),
        year_options: year_options(today),
    }
}

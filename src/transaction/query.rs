//! Aggregation queries over a user's transactions.
//!
//! All queries are built from a [TransactionFilter] so that the user, type and date window are
//! always bound as parameters.

use std::collections::BTreeMap;

use rusqlite::{Connection, ToSql, params_from_iter};
use time::{Date, Month};

use crate::{
    Amount, Error, UserID,
    calendar::Period,
    transaction::{Transaction, TransactionType, map_transaction_row},
};

/// The range of dates a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Every transaction regardless of date.
    AllTime,
    /// A calendar year.
    Year { first_day: Date, last_day: Date },
    /// A calendar month.
    Month(Period),
}

impl DateWindow {
    /// The window covering the whole of `year`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidYear] if `year` is not a supported year.
    pub fn year(year: i32) -> Result<Self, Error> {
        let first_day = Date::from_calendar_date(year, Month::January, 1)
            .map_err(|_| Error::InvalidYear(year))?;
        let last_day = Date::from_calendar_date(year, Month::December, 31)
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self::Year {
            first_day,
            last_day,
        })
    }

    fn bounds(&self) -> Option<(Date, Date)> {
        match self {
            DateWindow::AllTime => None,
            DateWindow::Year {
                first_day,
                last_day,
            } => Some((*first_day, *last_day)),
            DateWindow::Month(period) => Some((period.first_day(), period.last_day())),
        }
    }
}

impl From<Period> for DateWindow {
    fn from(period: Period) -> Self {
        DateWindow::Month(period)
    }
}

/// Selects a user's transactions, optionally by type and date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    user_id: UserID,
    transaction_type: Option<TransactionType>,
    window: DateWindow,
}

impl TransactionFilter {
    /// All of the user's transactions.
    pub fn new(user_id: UserID) -> Self {
        Self {
            user_id,
            transaction_type: None,
            window: DateWindow::AllTime,
        }
    }

    /// Only select transactions of `transaction_type`.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Only select transactions within `window`.
    pub fn window(mut self, window: impl Into<DateWindow>) -> Self {
        self.window = window.into();
        self
    }

    /// The SQL `WHERE` clause for this filter and the parameters it binds, in order.
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = vec!["user_id = ?"];
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(self.user_id.as_i64())];

        if let Some(transaction_type) = self.transaction_type {
            conditions.push("type = ?");
            params.push(Box::new(transaction_type));
        }

        if let Some((first_day, last_day)) = self.window.bounds() {
            conditions.push("date BETWEEN ? AND ?");
            params.push(Box::new(first_day));
            params.push(Box::new(last_day));
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Daily expense and income totals for a month, indexed by day of the month minus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotals {
    pub expense: Vec<Amount>,
    pub income: Vec<Amount>,
}

impl DailyTotals {
    /// Zero totals for every day of `period`.
    pub fn zeros(period: Period) -> Self {
        let days = usize::from(period.day_count());

        Self {
            expense: vec![Amount::ZERO; days],
            income: vec![Amount::ZERO; days],
        }
    }
}

/// The user's transactions in `period`, newest first.
///
/// Transactions on the same date are ordered by most recently created first.
pub fn list_for_period(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, params) = TransactionFilter::new(user_id).window(period).where_clause();
    let query = format!(
        "SELECT id, date, description, amount, type, category FROM \"transaction\" \
        {where_clause} ORDER BY date DESC, id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

/// The sum of the amounts of the transactions selected by `filter`, zero if there are none.
pub fn sum_by_type(filter: TransactionFilter, connection: &Connection) -> Result<Amount, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!("SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" {where_clause}");

    connection
        .query_row(&query, params_from_iter(params), |row| row.get(0))
        .map_err(|error| error.into())
}

/// The user's total spending per category in `period`.
///
/// Categories without any spending are absent.
pub fn sum_by_category_for_period(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<BTreeMap<String, Amount>, Error> {
    let (where_clause, params) = TransactionFilter::new(user_id)
        .transaction_type(TransactionType::Expense)
        .window(period)
        .where_clause();
    let query = format!(
        "SELECT category, SUM(amount) FROM \"transaction\" {where_clause} \
        GROUP BY category HAVING SUM(amount) > 0"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|row_result| row_result.map_err(|error| error.into()))
        .collect()
}

/// The user's expense and income totals for each day of `period`.
///
/// Days without transactions are zero.
pub fn sum_by_day_for_period(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<DailyTotals, Error> {
    let (where_clause, params) = TransactionFilter::new(user_id).window(period).where_clause();
    let query = format!(
        "SELECT CAST(strftime('%d', date) AS INTEGER), type, SUM(amount) \
        FROM \"transaction\" {where_clause} GROUP BY 1, type"
    );

    let mut totals = DailyTotals::zeros(period);
    let mut statement = connection.prepare(&query)?;
    let rows = statement.query_map(params_from_iter(params), |row| {
        Ok((
            row.get::<_, u8>(0)?,
            row.get::<_, TransactionType>(1)?,
            row.get::<_, Amount>(2)?,
        ))
    })?;

    for row in rows {
        let (day, transaction_type, amount) = row?;
        let series = match transaction_type {
            TransactionType::Expense => &mut totals.expense,
            TransactionType::Income => &mut totals.income,
        };

        if let Some(total) = usize::from(day)
            .checked_sub(1)
            .and_then(|index| series.get_mut(index))
        {
            *total = amount;
        }
    }

    Ok(totals)
}

/// The user's totals of `transaction_type` for each month of `year`, January first.
///
/// Months without transactions are zero.
pub fn sum_by_month_for_year(
    user_id: UserID,
    year: i32,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<[Amount; 12], Error> {
    let (where_clause, params) = TransactionFilter::new(user_id)
        .transaction_type(transaction_type)
        .window(DateWindow::year(year)?)
        .where_clause();
    let query = format!(
        "SELECT CAST(strftime('%m', date) AS INTEGER), SUM(amount) \
        FROM \"transaction\" {where_clause} GROUP BY 1"
    );

    let mut totals = [Amount::ZERO; 12];
    let mut statement = connection.prepare(&query)?;
    let rows = statement.query_map(params_from_iter(params), |row| {
        Ok((row.get::<_, u8>(0)?, row.get::<_, Amount>(1)?))
    })?;

    for row in rows {
        let (month, amount) = row?;

        if let Some(total) = usize::from(month)
            .checked_sub(1)
            .and_then(|index| totals.get_mut(index))
        {
            *total = amount;
        }
    }

    Ok(totals)
}

#[cfg(test)]
mod query_tests {
    use rusqlite::Connection;
    use time::{Date, Month, macros::date};

    use crate::{
        Amount, UserID,
        calendar::Period,
        test_utils::{create_test_user, get_test_connection},
        transaction::{
            DateWindow, Transaction, TransactionFilter, TransactionType, create_transaction,
            list_for_period, sum_by_category_for_period, sum_by_day_for_period,
            sum_by_month_for_year, sum_by_type,
        },
    };

    fn expense(
        user_id: UserID,
        cents: i64,
        date: Date,
        category: &str,
        connection: &Connection,
    ) -> Transaction {
        create_transaction(
            user_id,
            Transaction::build(Amount::from_cents(cents), date, "").category(Some(category)),
            connection,
        )
        .unwrap()
    }

    fn income(user_id: UserID, cents: i64, date: Date, connection: &Connection) -> Transaction {
        create_transaction(
            user_id,
            Transaction::build(Amount::from_cents(cents), date, "")
                .transaction_type(TransactionType::Income),
            connection,
        )
        .unwrap()
    }

    #[test]
    fn list_for_period_orders_newest_first() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        let first = expense(user_id, 100, date!(2024 - 03 - 05), "Food", &conn);
        let second = expense(user_id, 200, date!(2024 - 03 - 05), "Food", &conn);
        let latest = expense(user_id, 300, date!(2024 - 03 - 20), "Food", &conn);
        expense(user_id, 400, date!(2024 - 04 - 01), "Food", &conn);
        let other_user_id = create_test_user(&conn, "bar@baz.qux");
        expense(other_user_id, 500, date!(2024 - 03 - 10), "Food", &conn);

        let got = list_for_period(user_id, Period::new(2024, Month::March).unwrap(), &conn)
            .unwrap();

        assert_eq!(got, vec![latest, second, first]);
    }

    #[test]
    fn sum_by_type_defaults_to_zero() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");

        let total = sum_by_type(
            TransactionFilter::new(user_id).transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();

        assert_eq!(total, Amount::ZERO);
    }

    #[test]
    fn sum_by_type_respects_window() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        income(user_id, 10_000, date!(2023 - 12 - 31), &conn);
        income(user_id, 20_000, date!(2024 - 01 - 01), &conn);
        income(user_id, 30_000, date!(2024 - 02 - 15), &conn);
        expense(user_id, 5_000, date!(2024 - 02 - 15), "Food", &conn);
        let incomes = TransactionFilter::new(user_id).transaction_type(TransactionType::Income);

        let all_time = sum_by_type(incomes, &conn).unwrap();
        let yearly = sum_by_type(incomes.window(DateWindow::year(2024).unwrap()), &conn).unwrap();
        let monthly = sum_by_type(
            incomes.window(Period::new(2024, Month::February).unwrap()),
            &conn,
        )
        .unwrap();

        assert_eq!(all_time, Amount::from_cents(60_000));
        assert_eq!(yearly, Amount::from_cents(50_000));
        assert_eq!(monthly, Amount::from_cents(30_000));
    }

    #[test]
    fn sum_by_category_only_counts_expenses_in_period() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        expense(user_id, 10_000, date!(2024 - 03 - 01), "Food", &conn);
        expense(user_id, 5_000, date!(2024 - 03 - 31), "Food", &conn);
        expense(user_id, 2_500, date!(2024 - 03 - 10), "Transport", &conn);
        expense(user_id, 9_900, date!(2024 - 04 - 01), "Health", &conn);
        income(user_id, 100_000, date!(2024 - 03 - 15), &conn);

        let got =
            sum_by_category_for_period(user_id, Period::new(2024, Month::March).unwrap(), &conn)
                .unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got.get("Food"), Some(&Amount::from_cents(15_000)));
        assert_eq!(got.get("Transport"), Some(&Amount::from_cents(2_500)));
    }

    #[test]
    fn sum_by_day_has_one_entry_per_day() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        expense(user_id, 4_000, date!(2024 - 04 - 05), "Food", &conn);
        income(user_id, 20_000, date!(2024 - 04 - 05), &conn);
        expense(user_id, 1_000, date!(2024 - 04 - 30), "Food", &conn);
        expense(user_id, 1_000, date!(2024 - 04 - 30), "Leisure", &conn);

        let got = sum_by_day_for_period(user_id, Period::new(2024, Month::April).unwrap(), &conn)
            .unwrap();

        assert_eq!(got.expense.len(), 30);
        assert_eq!(got.income.len(), 30);
        assert_eq!(got.expense[4], Amount::from_cents(4_000));
        assert_eq!(got.income[4], Amount::from_cents(20_000));
        assert_eq!(got.expense[29], Amount::from_cents(2_000));
        assert_eq!(got.expense[0], Amount::ZERO);
    }

    #[test]
    fn sum_by_day_respects_leap_years() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        expense(user_id, 100, date!(2024 - 02 - 29), "Food", &conn);

        let leap =
            sum_by_day_for_period(user_id, Period::new(2024, Month::February).unwrap(), &conn)
                .unwrap();
        let common =
            sum_by_day_for_period(user_id, Period::new(2023, Month::February).unwrap(), &conn)
                .unwrap();

        assert_eq!(leap.expense.len(), 29);
        assert_eq!(leap.expense[28], Amount::from_cents(100));
        assert_eq!(common.expense.len(), 28);
    }

    #[test]
    fn sum_by_day_places_first_of_month_at_start() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        expense(user_id, 700, date!(2024 - 01 - 01), "Food", &conn);
        income(user_id, 300, date!(2024 - 01 - 31), &conn);

        let got = sum_by_day_for_period(user_id, Period::new(2024, Month::January).unwrap(), &conn)
            .unwrap();

        assert_eq!(got.expense[0], Amount::from_cents(700));
        assert_eq!(got.income[30], Amount::from_cents(300));
        assert_eq!(got.expense.iter().copied().sum::<Amount>(), Amount::from_cents(700));
    }

    #[test]
    fn sum_by_month_fills_missing_months_with_zero() {
        let conn = get_test_connection();
        let user_id = create_test_user(&conn, "foo@bar.baz");
        expense(user_id, 1_000, date!(2024 - 01 - 10), "Food", &conn);
        expense(user_id, 2_000, date!(2024 - 01 - 20), "Food", &conn);
        expense(user_id, 3_000, date!(2024 - 12 - 31), "Food", &conn);
        expense(user_id, 9_000, date!(2025 - 01 - 01), "Food", &conn);
        income(user_id, 50_000, date!(2024 - 06 - 01), &conn);

        let expenses =
            sum_by_month_for_year(user_id, 2024, TransactionType::Expense, &conn).unwrap();
        let incomes = sum_by_month_for_year(user_id, 2024, TransactionType::Income, &conn).unwrap();

        assert_eq!(expenses[0], Amount::from_cents(3_000));
        assert_eq!(expenses[11], Amount::from_cents(3_000));
        assert!(expenses[1..11].iter().all(|total| *total == Amount::ZERO));
        assert_eq!(incomes[5], Amount::from_cents(50_000));
        assert_eq!(incomes.iter().copied().sum::<Amount>(), Amount::from_cents(50_000));
    }
}

//! Database operations for monthly budgets.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::{Amount, Error, UserID};

/// Initialize the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            max_amount INTEGER NOT NULL,
            UNIQUE(user_id, category),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Set the maximum the user wants to spend in `category` each month.
///
/// Setting the budget of a category again replaces the previous amount.
///
/// # Errors
///
/// Returns an [Error::NonPositiveAmount] if `max_amount` is zero or negative, or an
/// [Error::MissingField] if `category` is blank.
pub fn set_budget(
    user_id: UserID,
    category: &str,
    max_amount: Amount,
    connection: &Connection,
) -> Result<(), Error> {
    let category = category.trim();

    if category.is_empty() {
        return Err(Error::MissingField("category"));
    }

    if !max_amount.is_positive() {
        return Err(Error::NonPositiveAmount(max_amount));
    }

    connection.execute(
        "INSERT INTO budget (user_id, category, max_amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, category) DO UPDATE SET max_amount = excluded.max_amount",
        (user_id.as_i64(), category, max_amount),
    )?;

    Ok(())
}

/// The user's budgets by category name, in alphabetical order.
pub fn get_budgets(
    user_id: UserID,
    connection: &Connection,
) -> Result<BTreeMap<String, Amount>, Error> {
    connection
        .prepare(
            "SELECT category, max_amount FROM budget \
            WHERE user_id = :user_id ORDER BY category ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Delete the user's budget for `category`. Deleting a budget that does not exist is a no-op.
pub fn delete_budget(
    user_id: UserID,
    category: &str,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM budget WHERE user_id = ?1 AND category = ?2",
        (user_id.as_i64(), category.trim()),
    )?;

    Ok(())
}

#[cfg(test)]
mod budget_tests {
    use crate::{
        Amount, Error,
        budget::{delete_budget, get_budgets, set_budget},
        test_utils::{create_test_user, get_test_connection},
    };

    #[test]
    fn set_budget_is_an_upsert() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "foo@bar.baz");

        set_budget(user_id, "Food", Amount::from_cents(10_000), &connection).unwrap();
        set_budget(user_id, "Food", Amount::from_cents(12_000), &connection).unwrap();

        let budgets = get_budgets(user_id, &connection).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets.get("Food"), Some(&Amount::from_cents(12_000)));
    }

    #[test]
    fn budgets_are_per_user_and_sorted() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "foo@bar.baz");
        let other_user_id = create_test_user(&connection, "bar@baz.qux");
        set_budget(user_id, "Transport", Amount::from_cents(5_000), &connection).unwrap();
        set_budget(user_id, "Food", Amount::from_cents(10_000), &connection).unwrap();
        set_budget(other_user_id, "Health", Amount::from_cents(1_000), &connection).unwrap();

        let budgets = get_budgets(user_id, &connection).unwrap();

        assert_eq!(
            budgets.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Food", "Transport"]
        );
    }

    #[test]
    fn set_budget_rejects_non_positive_amounts() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "foo@bar.baz");

        assert_eq!(
            set_budget(user_id, "Food", Amount::ZERO, &connection),
            Err(Error::NonPositiveAmount(Amount::ZERO))
        );
        assert_eq!(
            set_budget(user_id, "Food", Amount::from_cents(-100), &connection),
            Err(Error::NonPositiveAmount(Amount::from_cents(-100)))
        );
        assert!(get_budgets(user_id, &connection).unwrap().is_empty());
    }

    #[test]
    fn delete_budget_is_idempotent() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "foo@bar.baz");
        set_budget(user_id, "Food", Amount::from_cents(10_000), &connection).unwrap();

        assert_eq!(delete_budget(user_id, "Food", &connection), Ok(()));
        assert_eq!(delete_budget(user_id, "Food", &connection), Ok(()));
        assert!(get_budgets(user_id, &connection).unwrap().is_empty());
    }
}

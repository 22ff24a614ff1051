//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, OptionalExtension, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Amount, Error, UserID,
    calendar::iso_date,
    category::{INCOME_CATEGORY, RESERVED_CATEGORY},
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The name used in forms and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: Amount,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category name. Always [INCOME_CATEGORY] for income.
    pub category: String,
}

impl Transaction {
    /// Create a new expense.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Amount, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            transaction_type: TransactionType::Expense,
            category: None,
        }
    }
}

/// A builder for creating or updating [Transaction]s.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    pub amount: Amount,
    pub date: Date,
    pub description: String,
    pub transaction_type: TransactionType,
    /// The requested category, ignored for income.
    pub category: Option<String>,
}

impl TransactionBuilder {
    /// Set whether the transaction is an income or an expense.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Set the category of an expense.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_owned);
        self
    }

    /// The category the transaction is stored under.
    ///
    /// Income always goes to [INCOME_CATEGORY]. Expenses without a category, or with a blank
    /// one, go to [RESERVED_CATEGORY].
    pub fn resolved_category(&self) -> &str {
        match self.transaction_type {
            TransactionType::Income => INCOME_CATEGORY,
            TransactionType::Expense => self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(RESERVED_CATEGORY),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.amount.is_positive() {
            Ok(())
        } else {
            Err(Error::NonPositiveAmount(self.amount))
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Record a new transaction for the user.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, date, description, amount, type, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, date, description, amount, type, category",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.date,
                builder.description.trim(),
                builder.amount,
                builder.transaction_type,
                builder.resolved_category(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by the user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, description, amount, type, category FROM \"transaction\"
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite every field of one of the user's transactions.
///
/// Nothing is changed if an error is returned.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if no transaction has the ID `id`,
/// - [Error::Forbidden] if the transaction belongs to another user,
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let owner: Option<i64> = connection
        .query_row(
            "SELECT user_id FROM \"transaction\" WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;

    match owner {
        None => return Err(Error::UpdateMissingTransaction),
        Some(owner) if owner != user_id.as_i64() => {
            tracing::warn!("User {user_id} tried to update transaction {id} owned by user {owner}");
            return Err(Error::Forbidden);
        }
        Some(_) => {}
    }

    let transaction = connection
        .prepare(
            "UPDATE \"transaction\"
             SET date = ?1, description = ?2, amount = ?3, type = ?4, category = ?5
             WHERE id = ?6 AND user_id = ?7
             RETURNING id, date, description, amount, type, category",
        )?
        .query_row(
            (
                builder.date,
                builder.description.trim(),
                builder.amount,
                builder.transaction_type,
                builder.resolved_category(),
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete one of the user's transactions.
///
/// Deleting a transaction that does not exist, or that belongs to another user, is a no-op.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(())
}

/// Move all of the user's transactions in the category `from` to the category `to`.
///
/// Returns the number of transactions that were moved.
pub fn reassign_category(
    user_id: UserID,
    from: &str,
    to: &str,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET category = ?1 WHERE user_id = ?2 AND category = ?3",
            (to, user_id.as_i64(), from),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL DEFAULT 'Other',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the dashboard and chart queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let description = row.get(2)?;
    let amount = row.get(3)?;
    let transaction_type = row.get(4)?;
    let category = row.get(5)?;

    Ok(Transaction {
        id,
        date,
        description,
        amount,
        transaction_type,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

//! Creates the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    auth::create_user_table, budget::create_budget_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// Create all of the application's tables if they do not already exist.
///
/// Foreign keys are enabled on `connection` so that every row must belong to a registered user.
///
/// # Errors
///
/// Returns an error if a table could not be created, in which case no tables are created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

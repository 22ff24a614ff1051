//! Database operations for categories.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    budget::delete_budget,
    category::{CategoryName, DEFAULT_CATEGORIES, RESERVED_CATEGORY},
    transaction::reassign_category,
};

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Give a new user the default categories.
///
/// The caller should run this in the same SQL transaction as the one that creates the user.
pub fn create_default_categories(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let mut statement = connection.prepare("INSERT INTO category (user_id, name) VALUES (?1, ?2)")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((user_id.as_i64(), name))?;
    }

    Ok(())
}

/// Add a category for the user.
///
/// Returns the stored name, or `None` if `name` is empty after trimming, in which case nothing
/// is added.
///
/// # Errors
///
/// Returns an [Error::DuplicateCategory] if the user already has a category with the same
/// name. Names are case sensitive.
pub fn add_category(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<Option<CategoryName>, Error> {
    let Some(name) = CategoryName::new(name) else {
        return Ok(None);
    };

    match connection.execute(
        "INSERT INTO category (user_id, name) VALUES (?1, ?2)",
        (user_id.as_i64(), name.as_ref()),
    ) {
        Ok(_) => Ok(Some(name)),
        Err(rusqlite::Error::SqliteFailure(error, _))
            if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(Error::DuplicateCategory(name.to_string()))
        }
        Err(error) => Err(error.into()),
    }
}

/// Retrieve the names of all of the user's categories in alphabetical order.
pub fn get_category_names(user_id: UserID, connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT name FROM category WHERE user_id = :user_id ORDER BY name ASC")?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// Remove one of the user's categories.
///
/// The user's transactions in the category are moved to the reserved category and the
/// category's budget is deleted, all in one SQL transaction. Removing a category that does not
/// exist, or an empty name, is a no-op.
///
/// # Errors
///
/// Returns an [Error::ProtectedCategory] for the reserved category.
pub fn remove_category(user_id: UserID, name: &str, connection: &Connection) -> Result<(), Error> {
    let Some(name) = CategoryName::new(name) else {
        return Ok(());
    };

    if name.is_reserved() {
        return Err(Error::ProtectedCategory(name.to_string()));
    }

    let transaction = connection.unchecked_transaction()?;

    let moved = reassign_category(user_id, name.as_ref(), RESERVED_CATEGORY, &transaction)?;
    delete_budget(user_id, name.as_ref(), &transaction)?;
    transaction.execute(
        "DELETE FROM category WHERE user_id = ?1 AND name = ?2",
        (user_id.as_i64(), name.as_ref()),
    )?;

    transaction.commit()?;

    tracing::debug!(
        "Removed category {name} and moved {moved} transactions to {RESERVED_CATEGORY}"
    );

    Ok(())
}

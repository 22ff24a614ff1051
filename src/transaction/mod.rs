//! The transaction ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for recording transactions
//! - Database functions for storing and aggregating a user's transactions
//! - Route handlers for the transaction API

mod core;
mod endpoints;
mod form;
mod query;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, map_transaction_row,
    reassign_category, update_transaction,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    update_transaction_endpoint,
};
pub use form::TransactionForm;
pub use query::{
    DailyTotals, DateWindow, TransactionFilter, list_for_period, sum_by_category_for_period,
    sum_by_day_for_period, sum_by_month_for_year, sum_by_type,
};

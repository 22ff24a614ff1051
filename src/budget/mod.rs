//! Per-category monthly spending limits.

mod db;
mod endpoints;

pub use db::{create_budget_table, delete_budget, get_budgets, set_budget};
pub use endpoints::{delete_budget_endpoint, get_budgets_endpoint, set_budget_endpoint};

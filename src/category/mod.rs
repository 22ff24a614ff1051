//! Per-user expense categories.

mod db;
mod domain;
mod endpoints;

pub use db::{
    add_category, create_category_table, create_default_categories, get_category_names,
    remove_category,
};
pub use domain::{CategoryName, DEFAULT_CATEGORIES, INCOME_CATEGORY, RESERVED_CATEGORY};
pub use endpoints::{create_category_endpoint, delete_category_endpoint, get_categories};

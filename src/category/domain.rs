//! Core category domain types.

use std::fmt::Display;

/// The catch-all category that every user has and that cannot be deleted.
pub const RESERVED_CATEGORY: &str = "Other";

/// The fixed category given to every income transaction.
pub const INCOME_CATEGORY: &str = "Income";

/// The expense categories every new user starts with.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food",
    "Transport",
    "Housing",
    "Leisure",
    "Health",
    "Clothing",
    "Education",
    "Taxes",
    RESERVED_CATEGORY,
];

/// A non-empty category name with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, or `None` if `name` is empty after trimming.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();

        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_owned()))
        }
    }

    /// Whether this is the reserved catch-all category.
    pub fn is_reserved(&self) -> bool {
        self.0 == RESERVED_CATEGORY
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

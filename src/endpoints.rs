//! The API endpoints URIs.
//!
//! Endpoints that take a parameter use axum's `{name}` path syntax, e.g.,
//! '/api/transactions/{transaction_id}'.

/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route for logging in.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for logging out.
pub const LOG_OUT: &str = "/api/log_out";
/// The dashboard view-model for a month.
pub const DASHBOARD: &str = "/api/dashboard";
/// The reports view-model for a month.
pub const REPORTS: &str = "/api/reports";
/// The route for recording a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for fetching, updating and deleting a transaction.
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";
/// The route for listing and setting budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route for deleting the budget of a category.
pub const BUDGET: &str = "/api/budgets/{category}";
/// The route for listing and adding categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for removing a category.
pub const CATEGORY: &str = "/api/categories/{category}";
/// Daily expense and income series for a month.
pub const DAILY_FLOW_CHART: &str = "/api/chart-data/daily-flow";
/// Spending by category for a month.
pub const CATEGORY_CHART: &str = "/api/chart-data/categories";
/// Monthly expense and income series for a year.
pub const ANNUAL_FLOW_CHART: &str = "/api/chart-data/annual-flow";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Only the first parameter is replaced. Paths without a parameter are returned unchanged.
///
/// ```ignore
/// assert_eq!(
///     format_endpoint("/api/transactions/{transaction_id}", 1),
///     "/api/transactions/1"
/// );
/// ```
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD);
        assert_endpoint_is_valid_uri(endpoints::REPORTS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::BUDGETS);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::DAILY_FLOW_CHART);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY_CHART);
        assert_endpoint_is_valid_uri(endpoints::ANNUAL_FLOW_CHART);

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION_API, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BUDGET, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, 1));
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::TRANSACTION_API, 42),
            "/api/transactions/42"
        );
        assert_eq!(format_endpoint("/a/{id}/b", 7), "/a/7/b");
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::TRANSACTIONS_API, 1),
            endpoints::TRANSACTIONS_API
        );
    }
}

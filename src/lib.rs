//! Cuentas is a web app for tracking personal income, expenses and monthly budgets.
//!
//! This library provides a JSON API that serves the view-models (transaction lists,
//! monthly totals, budget progress and chart series) for a presentation layer to render.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod auth;
mod budget;
mod calendar;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use amount::Amount;
pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword};
pub use calendar::{Language, Period};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired auth cookie.
    #[error("you must log in to access this resource")]
    Unauthenticated,

    /// The password and its confirmation differ.
    #[error("the passwords do not match")]
    PasswordMismatch,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token could not be written to a cookie.
    #[error("could not create the auth cookie: {0}")]
    CookieError(String),

    /// The email is already registered to another user.
    #[error("this email is already registered")]
    DuplicateEmail,

    /// A required form field was missing or empty.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// A date string could not be parsed as a `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// An amount string could not be parsed as a decimal number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// Transaction and budget amounts must be greater than zero.
    #[error("amounts must be greater than zero, got {0}")]
    NonPositiveAmount(Amount),

    /// The transaction type was neither `income` nor `expense`.
    #[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// A month number outside of 1 to 12.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A year outside of the supported calendar range.
    #[error("{0} is not a supported year")]
    InvalidYear(i32),

    /// The record exists but belongs to another user.
    #[error("you do not have permission to modify this transaction")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// The user already has a category with this name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// Tried to delete the reserved catch-all category.
    #[error("the category \"{0}\" cannot be deleted")]
    ProtectedCategory(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A request or response body could not be read.
    #[error("could not read the message body")]
    BodyReadError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::PasswordMismatch
            | Error::TooWeak(_)
            | Error::MissingField(_)
            | Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::NonPositiveAmount(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::ProtectedCategory(_) => StatusCode::BAD_REQUEST,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound | Error::UpdateMissingTransaction => StatusCode::NOT_FOUND,
            Error::DuplicateEmail | Error::DuplicateCategory(_) => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::CookieError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::BodyReadError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server errors are not intended to be shown to the client.
        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Amount, Error, test_utils::parse_json};

    #[tokio::test]
    async fn validation_errors_are_bad_requests_with_message() {
        let response = Error::InvalidDate("2024-13-01".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json(response).await;
        assert_eq!(
            body["error"],
            "\"2024-13-01\" is not a valid date, expected the format YYYY-MM-DD"
        );
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(!message.contains("SQL"), "got message {message}");
    }

    #[test]
    fn ownership_and_conflict_errors_have_distinct_status_codes() {
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::UpdateMissingTransaction.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DuplicateCategory("Food".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::NonPositiveAmount(Amount::ZERO).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}

#![allow(missing_docs)]

use axum::{body::Body, response::Response};
use rusqlite::Connection;

use crate::{PasswordHash, UserID, auth::register_new_user, db::initialize};

/// An initialized in-memory database.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Register a user with the default categories and return their ID.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection, email: &str) -> UserID {
    register_new_user(email, PasswordHash::new_unchecked("hunter2"), connection)
        .expect("Could not create test user")
        .id
}

/// Parse the JSON body of `response`.
pub(crate) async fn parse_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

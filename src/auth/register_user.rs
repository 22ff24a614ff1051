//! Registration of new users.

use std::sync::{Arc, Mutex};

use axum::{
    Form, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{User, UserID, create_user},
    category::create_default_categories,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used to hash new passwords.
    pub hash_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            hash_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

/// The form data for registering a user.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// The details of a newly registered user.
#[derive(Debug, Serialize)]
struct RegisteredUser {
    id: UserID,
    email: String,
}

/// Create a user and their default categories in a single SQL transaction.
///
/// Either both the user and all of the default categories are created, or neither are.
///
/// # Errors
///
/// Returns an [Error::DuplicateEmail] if the email is already registered, an
/// [Error::MissingField] if the email is empty, or an [Error::SqlError] if any of the inserts
/// fail.
pub fn register_new_user(
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let transaction = connection.unchecked_transaction()?;

    let user = create_user(email, password_hash, &transaction)?;
    create_default_categories(user.id, &transaction)?;

    transaction.commit()?;

    Ok(user)
}

/// Route handler for registering a new user.
///
/// Responds with 201 Created and the new user's ID and email on success.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Result<Response, Error> {
    if user_data.email.trim().is_empty() {
        return Err(Error::MissingField("email"));
    }

    if user_data.password != user_data.confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let validated_password = ValidatedPassword::new(&user_data.password)?;
    let password_hash = PasswordHash::new(validated_password, state.hash_cost).inspect_err(
        |error| tracing::error!("an error occurred while hashing a password: {error}"),
    )?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = register_new_user(&user_data.email, password_hash, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            email: user.email,
        }),
    )
        .into_response())
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;

    use crate::{
        auth::register_user::{RegisterForm, RegistrationState, register_user},
        endpoints,
        test_utils::get_test_connection,
    };

    fn get_test_server() -> TestServer {
        let state = RegistrationState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            hash_cost: 4,
        };
        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    fn form(email: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    #[tokio::test]
    async fn create_user_succeeds() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&form(
                "foo@bar.baz",
                "iamtestingwhethericancreateanewuser",
                "iamtestingwhethericancreateanewuser",
            ))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["email"], "foo@bar.baz");
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn create_user_fails_with_existing_email() {
        let server = get_test_server();
        let registration = form(
            "foo@bar.baz",
            "averystrongandsecurepassword",
            "averystrongandsecurepassword",
        );
        server.post(endpoints::USERS).form(&registration).await;

        let response = server.post(endpoints::USERS).form(&registration).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_user_fails_when_password_is_weak() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&form("foo@bar.baz", "foo", "foo"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("too weak"));
    }

    #[tokio::test]
    async fn create_user_fails_when_passwords_do_not_match() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&form(
                "foo@bar.baz",
                "averystrongandsecurepassword",
                "thisisadifferentpassword",
            ))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "the passwords do not match");
    }

    #[tokio::test]
    async fn create_user_fails_when_email_is_empty() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&form(
                "",
                "averystrongandsecurepassword",
                "averystrongandsecurepassword",
            ))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

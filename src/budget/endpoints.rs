//! Route handlers for listing, setting and deleting budgets.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Amount, AppState, Error, UserID,
    budget::{delete_budget, get_budgets, set_budget},
};

/// The state needed by the budget route handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for setting a budget.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetForm {
    pub category: String,
    pub max_amount: String,
}

/// Route handler that lists the user's budgets by category.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<BTreeMap<String, Amount>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets(user_id, &connection).map(Json)
}

/// Route handler for creating or replacing the budget of a category.
pub async fn set_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<BudgetForm>,
) -> Result<StatusCode, Error> {
    let max_amount: Amount = form.max_amount.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    set_budget(user_id, &form.category, max_amount, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Route handler for deleting the budget of a category.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(category): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(user_id, &category, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        http::StatusCode,
        routing::{delete, get},
    };
    use axum_test::TestServer;

    use crate::{
        budget::endpoints::{
            BudgetForm, BudgetState, delete_budget_endpoint, get_budgets_endpoint,
            set_budget_endpoint,
        },
        endpoints,
        test_utils::{create_test_user, get_test_connection},
    };

    fn get_test_server() -> TestServer {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "foo@bar.baz");
        let state = BudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(
                endpoints::BUDGETS,
                get(get_budgets_endpoint).post(set_budget_endpoint),
            )
            .route(endpoints::BUDGET, delete(delete_budget_endpoint))
            .layer(Extension(user_id))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    fn form(category: &str, max_amount: &str) -> BudgetForm {
        BudgetForm {
            category: category.to_owned(),
            max_amount: max_amount.to_owned(),
        }
    }

    #[tokio::test]
    async fn set_then_list_budgets() {
        let server = get_test_server();

        server
            .post(endpoints::BUDGETS)
            .form(&form("Food", "100"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .post(endpoints::BUDGETS)
            .form(&form("Food", "120.50"))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let body: serde_json::Value = server.get(endpoints::BUDGETS).await.json();
        assert_eq!(body, serde_json::json!({ "Food": 120.5 }));
    }

    #[tokio::test]
    async fn set_budget_rejects_invalid_amount() {
        let server = get_test_server();

        server
            .post(endpoints::BUDGETS)
            .form(&form("Food", "abc"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post(endpoints::BUDGETS)
            .form(&form("Food", "0"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_budget_removes_it() {
        let server = get_test_server();
        server
            .post(endpoints::BUDGETS)
            .form(&form("Food", "100"))
            .await;

        server
            .delete("/api/budgets/Food")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let body: serde_json::Value = server.get(endpoints::BUDGETS).await.json();
        assert_eq!(body, serde_json::json!({}));
    }
}

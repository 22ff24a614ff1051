//! Dashboard, reports and chart data route handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    calendar::{Language, Period},
    dashboard::{
        charts::{
            AnnualFlowChart, CategoryChart, DailyFlowChart, annual_flow_chart, category_chart,
            daily_flow_chart,
        },
        summary::{DashboardView, ReportsView, build_dashboard_view},
    },
    timezone::get_local_today,
    transaction::DateWindow,
};

/// The state needed for the dashboard, reports and chart data.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for querying transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The language used when a request does not ask for one.
    pub language: Language,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            language: state.language,
        }
    }
}

/// Query parameters selecting the period and language of a view.
///
/// Missing fields default to the current local year and month, and the server's language.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub lang: Option<Language>,
}

impl PeriodQuery {
    fn language(&self, state: &DashboardState) -> Language {
        self.lang.unwrap_or(state.language)
    }
}

/// Route handler for the dashboard view-model.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardView>, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let period = Period::from_query(query.year, query.month, today)?;
    let language = query.language(&state);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(build_dashboard_view(
        user_id,
        period,
        today,
        language,
        &connection,
    )))
}

/// Route handler for the reports view-model.
pub async fn get_reports(
    State(state): State<DashboardState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ReportsView>, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let period = Period::from_query(query.year, query.month, today)?;

    Ok(Json(ReportsView::new(period, today, query.language(&state))))
}

/// Route handler for the daily expense and income chart of a month.
pub async fn get_daily_flow_chart(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DailyFlowChart>, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let period = Period::from_query(query.year, query.month, today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(daily_flow_chart(user_id, period, &connection)))
}

/// Route handler for the spending by category chart of a month.
pub async fn get_category_chart(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<CategoryChart>, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let period = Period::from_query(query.year, query.month, today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(category_chart(user_id, period, &connection)))
}

/// Route handler for the monthly expense and income chart of a year.
///
/// The month query parameter is ignored.
pub async fn get_annual_flow_chart(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<AnnualFlowChart>, Error> {
    let year = match query.year {
        Some(year) => year,
        None => get_local_today(&state.local_timezone)?.year(),
    };
    // Reject unsupported years here so they are not mistaken for empty series.
    DateWindow::year(year)?;
    let language = query.language(&state);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(annual_flow_chart(user_id, year, language, &connection)))
}

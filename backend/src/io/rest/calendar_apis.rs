//! # REST API for the Calendar
//!
//! Serves the 42-cell month grid and the shared focus date.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use shared::CalendarFocusDate;

#[derive(Debug, Deserialize)]
pub struct CalendarMonthParams {
    pub month: u32,
    pub year: i32,
}

/// Get the month grid with appointments for the whole 42-cell window
pub async fn get_calendar_month(
    State(state): State<AppState>,
    Query(params): Query<CalendarMonthParams>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - {}/{}", params.month, params.year);

    let result = state
        .calendar_service
        .month_view(params.month, params.year, &state.appointment_service)
        .await;

    match result {
        Ok(calendar) => (StatusCode::OK, Json(calendar)).into_response(),
        Err(e) => {
            error!("Failed to build calendar month: {}", e);
            let status = if e.to_string().contains("Invalid month") {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Get the calendar focus date
pub async fn get_calendar_focus(State(state): State<AppState>) -> impl IntoResponse {
    let focus = state.calendar_service.get_focus_date();
    (StatusCode::OK, Json(focus)).into_response()
}

/// Set the calendar focus date
pub async fn set_calendar_focus(
    State(state): State<AppState>,
    Json(request): Json<CalendarFocusDate>,
) -> impl IntoResponse {
    info!("PUT /api/calendar/focus - {}/{}", request.month, request.year);

    match state.calendar_service.set_focus_date(request.month, request.year) {
        Ok(focus) => (StatusCode::OK, Json(focus)).into_response(),
        Err(message) => (StatusCode::BAD_REQUEST, message).into_response(),
    }
}

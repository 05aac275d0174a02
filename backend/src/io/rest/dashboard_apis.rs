//! # REST API for the Dashboard

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::error;

use crate::AppState;

/// Get the KPI summary, monthly revenue series and recent activity
pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    match state.dashboard_service.summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to build dashboard summary: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building dashboard").into_response()
        }
    }
}

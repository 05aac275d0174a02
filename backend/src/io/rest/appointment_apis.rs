//! # REST API for Appointments

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::AppState;
use shared::CreateAppointmentRequest;

/// Create a new appointment
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> impl IntoResponse {
    info!("POST /api/appointments - {} on {}", request.title, request.date);

    match state.appointment_service.create_appointment(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create appointment: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List all appointments
pub async fn list_appointments(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/appointments");

    match state.appointment_service.list_appointments().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list appointments: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing appointments").into_response()
        }
    }
}

//! # Automation API
//!
//! External-system entry point (n8n, Zapier and the like). Requests carry an
//! `X-Api-Key` header; writes land exactly like in-app ones and reach other
//! clients only through the change feed.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::AppState;
use shared::CreateInvoiceRequest;

/// Create an invoice on behalf of an external automation
pub async fn automation_create_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let Some(api_key) = headers.get("x-api-key").and_then(|value| value.to_str().ok()) else {
        warn!("Automation request without X-Api-Key header");
        return (StatusCode::UNAUTHORIZED, "Missing X-Api-Key header").into_response();
    };

    let record = match state.api_key_service.authenticate(api_key).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (StatusCode::UNAUTHORIZED, "Invalid or revoked API key").into_response();
        }
        Err(e) => {
            error!("API key lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error validating API key").into_response();
        }
    };

    info!("POST /api/automation/invoices via key {}", record.key_prefix);

    match state.invoice_service.create_invoice(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Automation invoice rejected: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

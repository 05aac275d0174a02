//! # REST API for Invoices
//!
//! Endpoints for creating invoices, listing and searching them, reading the
//! header stats, and driving status changes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::commands::invoices::InvoiceListQuery;
use crate::AppState;
use shared::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Create a new invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    info!("POST /api/invoices - client: {}", request.client);

    match state.invoice_service.create_invoice(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create invoice: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List invoices, with optional search text and status filter
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> impl IntoResponse {
    info!("GET /api/invoices - q: {:?}, status: {:?}", params.q, params.status);

    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(value) => match value.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                return (StatusCode::BAD_REQUEST, format!("Unknown status: {}", value))
                    .into_response()
            }
        },
    };

    let query = InvoiceListQuery { q: params.q, status };

    match state.invoice_service.list_invoices(query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list invoices: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing invoices").into_response()
        }
    }
}

/// Header sums for the invoices page
pub async fn invoice_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.invoice_service.stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            error!("Failed to compute invoice stats: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing stats").into_response()
        }
    }
}

/// Get an invoice by number
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/invoices/{}", number);

    match state.invoice_service.get_invoice(&number).await {
        Ok(Some(invoice)) => (StatusCode::OK, Json(invoice)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Invoice not found").into_response(),
        Err(e) => {
            error!("Failed to get invoice: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving invoice").into_response()
        }
    }
}

/// Set an invoice's status
pub async fn set_invoice_status(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<UpdateInvoiceStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/invoices/{}/status - {:?}", number, request.status);

    match state.invoice_service.set_status(&number, request.status).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to set invoice status: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Mark an invoice sent
pub async fn send_invoice(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/invoices/{}/send", number);

    match state.invoice_service.mark_sent(&number).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to send invoice: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete an invoice
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/invoices/{}", number);

    match state.invoice_service.delete_invoice(&number).await {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to delete invoice: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

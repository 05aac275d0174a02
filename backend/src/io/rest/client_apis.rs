//! # REST API for the Client Directory
//!
//! Endpoints for creating, listing, updating, starring and deleting clients.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::commands::clients::{ClientFilter, ClientListQuery};
use crate::AppState;
use shared::{CreateClientRequest, UpdateClientRequest};

#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    pub q: Option<String>,
    pub filter: Option<String>,
}

/// Create a new client
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> impl IntoResponse {
    info!("POST /api/clients - name: {}", request.name);

    match state.client_service.create_client(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create client: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List clients with optional search and filter slice
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientListParams>,
) -> impl IntoResponse {
    info!("GET /api/clients - q: {:?}, filter: {:?}", params.q, params.filter);

    let query = ClientListQuery {
        q: params.q,
        filter: params
            .filter
            .as_deref()
            .map(ClientFilter::parse)
            .unwrap_or_default(),
    };

    match state.client_service.list_clients(query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list clients: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing clients").into_response()
        }
    }
}

/// Header counts for the clients page
pub async fn client_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.client_service.stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            error!("Failed to compute client stats: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing stats").into_response()
        }
    }
}

/// Get a client by ID
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/clients/{}", client_id);

    match state.client_service.get_client(&client_id).await {
        Ok(Some(client)) => (StatusCode::OK, Json(client)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Client not found").into_response(),
        Err(e) => {
            error!("Failed to get client: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving client").into_response()
        }
    }
}

/// Update a client
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    info!("PUT /api/clients/{}", client_id);

    match state.client_service.update_client(&client_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update client: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Toggle a client's starred flag
pub async fn toggle_client_star(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    info!("PUT /api/clients/{}/star", client_id);

    match state.client_service.toggle_star(&client_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to toggle star: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/clients/{}", client_id);

    match state.client_service.delete_client(&client_id).await {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to delete client: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

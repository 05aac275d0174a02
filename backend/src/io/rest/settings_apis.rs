//! # REST API for Settings
//!
//! Workspace profile plus API key management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::AppState;
use shared::{GenerateApiKeyRequest, UpdateProfileRequest};

/// Get the workspace profile
pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    match state.settings_service.get_profile().await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to get profile: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving profile").into_response()
        }
    }
}

/// Update the workspace profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/profile");

    match state.settings_service.update_profile(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update profile: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List API keys (metadata only)
pub async fn list_api_keys(State(state): State<AppState>) -> impl IntoResponse {
    match state.api_key_service.list().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list API keys: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing API keys").into_response()
        }
    }
}

/// Generate a new API key
pub async fn generate_api_key(
    State(state): State<AppState>,
    Json(request): Json<GenerateApiKeyRequest>,
) -> impl IntoResponse {
    info!("POST /api/settings/api-keys - label: {}", request.label);

    match state.api_key_service.generate(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to generate API key: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Revoke an API key
pub async fn revoke_api_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/settings/api-keys/{}/revoke", key_id);

    match state.api_key_service.revoke(&key_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to revoke API key: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

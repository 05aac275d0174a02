//! # BizPulse Backend
//!
//! Non-UI logic for the BizPulse small-business dashboard.
//!
//! The backend follows a layered architecture:
//! ```text
//! Frontend (state containers + view models)
//!     |
//! IO Layer (REST API, change feed)
//!     |
//! Domain Layer (services, business rules)
//!     |
//! Storage Layer (SQLite via sqlx)
//! ```
//!
//! The crate root wires the layers together: it builds the application
//! state, assembles the axum router, and exposes both to the binary and to
//! the integration tests.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{
    event_channel, ApiKeyService, AppointmentService, CalendarService, ClientService,
    DashboardService, EventSender, InvoiceService, SettingsService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub invoice_service: InvoiceService,
    pub client_service: ClientService,
    pub appointment_service: AppointmentService,
    pub calendar_service: CalendarService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub api_key_service: ApiKeyService,
    pub events: EventSender,
}

/// Build the application state around an open database connection
pub fn build_state(db: DbConnection) -> AppState {
    let db = Arc::new(db);
    let events = event_channel();

    AppState {
        invoice_service: InvoiceService::new(db.clone(), events.clone()),
        client_service: ClientService::new(db.clone(), events.clone()),
        appointment_service: AppointmentService::new(db.clone(), events.clone()),
        calendar_service: CalendarService::new(),
        dashboard_service: DashboardService::new(db.clone()),
        settings_service: SettingsService::new(db.clone(), events.clone()),
        api_key_service: ApiKeyService::new(db),
        events,
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init().await?;

    info!("Setting up application state");
    Ok(build_state(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    use crate::io::rest::{
        appointment_apis, automation_apis, calendar_apis, client_apis, dashboard_apis,
        invoice_apis, settings_apis,
    };

    let api_routes = Router::new()
        .route(
            "/invoices",
            get(invoice_apis::list_invoices).post(invoice_apis::create_invoice),
        )
        .route("/invoices/stats", get(invoice_apis::invoice_stats))
        .route(
            "/invoices/:number",
            get(invoice_apis::get_invoice).delete(invoice_apis::delete_invoice),
        )
        .route("/invoices/:number/status", put(invoice_apis::set_invoice_status))
        .route("/invoices/:number/send", post(invoice_apis::send_invoice))
        .route(
            "/clients",
            get(client_apis::list_clients).post(client_apis::create_client),
        )
        .route("/clients/stats", get(client_apis::client_stats))
        .route(
            "/clients/:id",
            get(client_apis::get_client)
                .put(client_apis::update_client)
                .delete(client_apis::delete_client),
        )
        .route("/clients/:id/star", put(client_apis::toggle_client_star))
        .route(
            "/appointments",
            get(appointment_apis::list_appointments).post(appointment_apis::create_appointment),
        )
        .route("/calendar/month", get(calendar_apis::get_calendar_month))
        .route(
            "/calendar/focus",
            get(calendar_apis::get_calendar_focus).put(calendar_apis::set_calendar_focus),
        )
        .route("/dashboard", get(dashboard_apis::get_dashboard))
        .route(
            "/settings/profile",
            get(settings_apis::get_profile).put(settings_apis::update_profile),
        )
        .route(
            "/settings/api-keys",
            get(settings_apis::list_api_keys).post(settings_apis::generate_api_key),
        )
        .route(
            "/settings/api-keys/:id/revoke",
            post(settings_apis::revoke_api_key),
        )
        .route(
            "/automation/invoices",
            post(automation_apis::automation_create_invoice),
        )
        .route("/events", get(crate::io::events::change_feed));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

//! End-to-end tests driving the REST API over a real socket.

use futures::StreamExt;
use reqwest::Client;

use bizpulse_backend::storage::DbConnection;
use bizpulse_backend::{build_state, create_router};
use shared::{
    AppointmentListResponse, CalendarMonth, ClientResponse, GenerateApiKeyResponse, Invoice,
    InvoiceListResponse, InvoiceResponse, InvoiceStats, WorkspaceProfile,
};

/// Boot the full router on an ephemeral port, backed by a fresh in-memory
/// database, and return its base URL.
async fn spawn_server() -> String {
    let db = DbConnection::init_test().await.expect("Failed to create test database");
    let app = create_router(build_state(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server crashed");
    });

    format!("http://{}", addr)
}

fn invoice_payload(client: &str) -> serde_json::Value {
    serde_json::json!({
        "client": client,
        "email": "billing@acme.com",
        "due_date": "2026-03-10",
        "currency": "USD",
        "items": [
            { "description": "UI/UX Audit", "quantity": 2, "rate": 300.0 },
            { "description": "Prototype Build", "quantity": 1, "rate": 150.0 }
        ]
    })
}

#[tokio::test]
async fn invoice_lifecycle_over_http() {
    let base = spawn_server().await;
    let http = Client::new();

    // Create
    let response = http
        .post(format!("{}/api/invoices", base))
        .json(&invoice_payload("Acme Corp"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: InvoiceResponse = response.json().await.unwrap();
    assert_eq!(created.invoice.number, "INV-001");
    assert_eq!(created.invoice.amount, 750.0);

    // List
    let listed: InvoiceListResponse = http
        .get(format!("{}/api/invoices", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.invoices.len(), 1);

    // Status change
    let response = http
        .put(format!("{}/api/invoices/INV-001/status", base))
        .json(&serde_json::json!({ "status": "paid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let invoice: Invoice = http
        .get(format!("{}/api/invoices/INV-001", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(invoice.status.as_str(), "paid");

    // Stats reflect the paid invoice
    let stats: InvoiceStats = http
        .get(format!("{}/api/invoices/stats", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.paid, 750.0);

    // Delete
    let response = http
        .delete(format!("{}/api/invoices/INV-001", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = http
        .get(format!("{}/api/invoices/INV-001", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn invalid_invoice_is_rejected() {
    let base = spawn_server().await;
    let http = Client::new();

    let mut payload = invoice_payload("Acme Corp");
    payload["items"] = serde_json::json!([]);

    let response = http
        .post(format!("{}/api/invoices", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Unknown status filter is a client error, not a 500
    let response = http
        .get(format!("{}/api/invoices?status=shipped", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn client_star_round_trip() {
    let base = spawn_server().await;
    let http = Client::new();

    let created: ClientResponse = http
        .post(format!("{}/api/clients", base))
        .json(&serde_json::json!({
            "name": "Acme Corp",
            "email": "billing@acme.com",
            "phone": "+1 555-0101",
            "company": "Acme Corporation",
            "location": "New York, NY",
            "notes": ""
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!created.client.starred);

    let starred: ClientResponse = http
        .put(format!("{}/api/clients/{}/star", base, created.client.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(starred.client.starred);
}

#[tokio::test]
async fn calendar_month_includes_appointments() {
    let base = spawn_server().await;
    let http = Client::new();

    let response = http
        .post(format!("{}/api/appointments", base))
        .json(&serde_json::json!({
            "date": "2026-02-10",
            "time": "09:00",
            "title": "Client Onboarding",
            "client": "John Smith",
            "notes": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let listed: AppointmentListResponse = http
        .get(format!("{}/api/appointments", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.appointments.len(), 1);

    let month: CalendarMonth = http
        .get(format!("{}/api/calendar/month?month=2&year=2026", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(month.days.len(), 42);
    let feb_10 = month.days.iter().find(|d| d.date_key == "2026-02-10").unwrap();
    assert_eq!(feb_10.appointments.len(), 1);

    // Month 13 is a client error
    let response = http
        .get(format!("{}/api/calendar/month?month=13&year=2026", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn automation_endpoint_requires_valid_api_key() {
    let base = spawn_server().await;
    let http = Client::new();

    // No key
    let response = http
        .post(format!("{}/api/automation/invoices", base))
        .json(&invoice_payload("Acme Corp"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Generate a key through settings
    let generated: GenerateApiKeyResponse = http
        .post(format!("{}/api/settings/api-keys", base))
        .json(&serde_json::json!({ "label": "n8n workflow" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = http
        .post(format!("{}/api/automation/invoices", base))
        .header("X-Api-Key", &generated.api_key)
        .json(&invoice_payload("Acme Corp"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Revoked keys stop working
    let response = http
        .post(format!("{}/api/settings/api-keys/{}/revoke", base, generated.info.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = http
        .post(format!("{}/api/automation/invoices", base))
        .header("X-Api-Key", &generated.api_key)
        .json(&invoice_payload("Acme Corp"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn profile_defaults_then_updates() {
    let base = spawn_server().await;
    let http = Client::new();

    let profile: WorkspaceProfile = http
        .get(format!("{}/api/settings/profile", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile.role, "Admin");
    assert_eq!(profile.currency.as_str(), "USD");

    let response = http
        .put(format!("{}/api/settings/profile", base))
        .json(&serde_json::json!({
            "full_name": "Jordan Reyes",
            "email": "jordan@bizpulse.app",
            "role": "Admin",
            "company_name": "Reyes Consulting",
            "industry": "consulting",
            "currency": "EUR",
            "timezone": "Europe/Helsinki",
            "email_notifications": true,
            "weekly_report": true,
            "dark_mode": false
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let profile: WorkspaceProfile = http
        .get(format!("{}/api/settings/profile", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile.currency.as_str(), "EUR");

    // Invoices created without a currency now pick up EUR
    let mut payload = invoice_payload("Acme Corp");
    payload.as_object_mut().unwrap().remove("currency");
    let created: InvoiceResponse = http
        .post(format!("{}/api/invoices", base))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.invoice.currency.as_str(), "EUR");
}

#[tokio::test]
async fn change_feed_streams_write_events() {
    let base = spawn_server().await;
    let http = Client::new();

    // Subscribe before writing
    let feed = http
        .get(format!("{}/api/events", base))
        .send()
        .await
        .unwrap();
    assert_eq!(feed.status(), 200);
    let mut body = feed.bytes_stream();

    // Write an invoice through the normal endpoint
    let response = http
        .post(format!("{}/api/invoices", base))
        .json(&invoice_payload("Acme Corp"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // The event, with the record payload, shows up on the stream
    let mut received = String::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
        if received.contains("INV-001") {
            break;
        }
    }

    assert!(received.contains("event: change"));
    assert!(received.contains("\"table\":\"invoices\""));
    assert!(received.contains("\"op\":\"created\""));
}

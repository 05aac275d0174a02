//! # Domain Layer
//!
//! Business logic for the BizPulse workspace. Each page of the dashboard is
//! backed by one service; services own the storage connection, validate
//! input, and publish a change event after every successful write so
//! subscribed clients can update incrementally.

pub mod api_key_service;
pub mod appointment_service;
pub mod calendar;
pub mod client_service;
pub mod commands;
pub mod dashboard_service;
pub mod invoice_service;
pub mod settings_service;

pub use api_key_service::ApiKeyService;
pub use appointment_service::AppointmentService;
pub use calendar::CalendarService;
pub use client_service::ClientService;
pub use dashboard_service::DashboardService;
pub use invoice_service::InvoiceService;
pub use settings_service::SettingsService;

use shared::{ChangeEvent, ChangeOp, ChangeTable};
use tokio::sync::broadcast;

/// Sender half of the change-notification channel
pub type EventSender = broadcast::Sender<ChangeEvent>;

/// Create the change-notification channel shared by all services
pub fn event_channel() -> EventSender {
    broadcast::channel(256).0
}

/// Publish a change event. Having no subscribers is not an error.
pub(crate) fn publish_change(
    events: &EventSender,
    table: ChangeTable,
    op: ChangeOp,
    id: &str,
    record: Option<serde_json::Value>,
) {
    let event = ChangeEvent {
        table,
        op,
        id: id.to_string(),
        record,
    };
    if events.send(event).is_err() {
        tracing::debug!("change event for {} dropped: no subscribers", id);
    }
}

/// Current UTC timestamp in RFC 3339, the format every record stores
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Current epoch milliseconds, used for record id generation
pub(crate) fn now_epoch_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Today's local date as a date key (YYYY-MM-DD)
pub(crate) fn today_key() -> String {
    use chrono::Datelike;
    let now = chrono::Local::now();
    shared::date_key(now.year(), now.month(), now.day())
}

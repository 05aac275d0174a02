//! # Application State
//!
//! One state container per page plus the top-level [`AppContext`] that owns
//! them. Every mutation goes through an explicit method; nothing here is a
//! global.

pub mod app_state;
pub mod calendar_state;
pub mod client_state;
pub mod invoice_state;
pub mod settings_state;

pub use app_state::{AppContext, Page};
pub use calendar_state::{AppointmentFormState, CalendarState};
pub use client_state::{ClientFilter, ClientFormState, ClientPageState};
pub use invoice_state::{InvoiceFormState, InvoicePageState, LineItemForm};
pub use settings_state::{ProfileFormState, SettingsState};

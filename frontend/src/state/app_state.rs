//! # Core Application State
//!
//! The top-level state container. It owns the record caches, the per-page
//! states, and the one-alert error surface. A rendering shell mutates it
//! only through these methods and re-renders from the view builders after
//! every change.

use serde_json::from_value;
use shared::{
    Appointment, ChangeEvent, ChangeTable, Client, CurrencyCode, DashboardSummary, Invoice,
    WorkspaceProfile,
};

use crate::services::sync::apply_change;
use crate::state::{CalendarState, ClientPageState, InvoicePageState, SettingsState};

/// Pages reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Calendar,
    Invoices,
    Clients,
    Settings,
    Help,
}

/// Top-level application state
pub struct AppContext {
    /// Currently shown page
    pub page: Page,

    /// Record caches, newest first, replaced wholesale on load and patched
    /// incrementally by change events
    pub invoices: Vec<Invoice>,
    pub clients: Vec<Client>,
    pub appointments: Vec<Appointment>,

    /// Workspace profile, once loaded
    pub profile: Option<WorkspaceProfile>,

    /// Dashboard read model, once loaded
    pub dashboard: Option<DashboardSummary>,

    /// Per-page state
    pub invoice_state: InvoicePageState,
    pub client_state: ClientPageState,
    pub calendar_state: CalendarState,
    pub settings_state: SettingsState,

    /// True while a remote call is in flight
    pub loading: bool,

    /// Blocking alert raised by any failed remote call
    pub alert: Option<String>,
}

impl AppContext {
    /// Create the initial application state
    pub fn new() -> Self {
        Self {
            page: Page::Dashboard,
            invoices: Vec::new(),
            clients: Vec::new(),
            appointments: Vec::new(),
            profile: None,
            dashboard: None,
            invoice_state: InvoicePageState::new(),
            client_state: ClientPageState::new(),
            calendar_state: CalendarState::new(),
            settings_state: SettingsState::new(),
            loading: false,
            alert: None,
        }
    }

    /// Switch the visible page
    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Currency for display formatting, from settings once loaded
    pub fn currency(&self) -> CurrencyCode {
        self.profile
            .as_ref()
            .map(|profile| profile.currency)
            .unwrap_or_default()
    }

    /// Replace the invoice cache wholesale (initial load or resync)
    pub fn set_invoices(&mut self, invoices: Vec<Invoice>) {
        self.invoices = invoices;
    }

    /// Replace the client cache wholesale
    pub fn set_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
    }

    /// Replace the appointment cache wholesale
    pub fn set_appointments(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
    }

    pub fn set_profile(&mut self, profile: WorkspaceProfile) {
        self.settings_state.load_profile(&profile);
        self.profile = Some(profile);
    }

    pub fn set_dashboard(&mut self, dashboard: DashboardSummary) {
        self.dashboard = Some(dashboard);
    }

    /// Surface a failed remote call. Local state stays untouched; the shell
    /// blocks on the alert until the user dismisses it.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.alert = Some(message);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Patch the record caches from one change notification. Returns whether
    /// anything visible changed.
    pub fn apply_event(&mut self, event: &ChangeEvent) -> bool {
        match event.table {
            ChangeTable::Invoices => apply_change(&mut self.invoices, event),
            ChangeTable::Clients => apply_change(&mut self.clients, event),
            ChangeTable::Appointments => apply_change(&mut self.appointments, event),
            ChangeTable::Profile => match event.record.clone().map(from_value::<WorkspaceProfile>) {
                Some(Ok(profile)) => {
                    self.set_profile(profile);
                    true
                }
                _ => false,
            },
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

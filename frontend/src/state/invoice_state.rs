//! # Invoices Page State
//!
//! Search, filter and modal state for the invoice table, plus the creation
//! form. Numeric form fields are kept as strings while editing; parsing
//! coerces empty or malformed input to zero so a half-typed row never breaks
//! the live total.

use shared::{line_item_total, CreateInvoiceRequest, InvoiceStatus, LineItem};

/// State for the invoices page
pub struct InvoicePageState {
    pub search_query: String,
    /// `None` shows all statuses
    pub status_filter: Option<InvoiceStatus>,
    pub show_create_modal: bool,
    /// Number of the invoice open in the detail view
    pub view_invoice: Option<String>,
    pub form: InvoiceFormState,
}

impl InvoicePageState {
    pub fn new() -> Self {
        Self {
            search_query: String::new(),
            status_filter: None,
            show_create_modal: false,
            view_invoice: None,
            form: InvoiceFormState::new(),
        }
    }

    pub fn open_create_modal(&mut self) {
        self.form = InvoiceFormState::new();
        self.show_create_modal = true;
    }

    pub fn close_create_modal(&mut self) {
        self.show_create_modal = false;
    }
}

impl Default for InvoicePageState {
    fn default() -> Self {
        Self::new()
    }
}

/// One editable line-item row
pub struct LineItemForm {
    pub description: String,
    pub quantity: String,
    pub rate: String,
}

impl LineItemForm {
    pub fn new() -> Self {
        Self {
            description: String::new(),
            quantity: "1".to_string(),
            rate: String::new(),
        }
    }

    /// Empty or malformed input counts as zero
    pub fn parsed_quantity(&self) -> u32 {
        self.quantity.trim().parse().unwrap_or(0)
    }

    /// Empty or malformed input counts as zero
    pub fn parsed_rate(&self) -> f64 {
        self.rate.trim().parse().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.parsed_quantity() as f64 * self.parsed_rate()
    }
}

impl Default for LineItemForm {
    fn default() -> Self {
        Self::new()
    }
}

/// The invoice creation form
pub struct InvoiceFormState {
    pub client: String,
    pub email: String,
    pub due_date: String,
    pub items: Vec<LineItemForm>,
    pub is_submitting: bool,
}

impl InvoiceFormState {
    pub fn new() -> Self {
        Self {
            client: String::new(),
            email: String::new(),
            due_date: String::new(),
            items: vec![LineItemForm::new()],
            is_submitting: false,
        }
    }

    pub fn add_item(&mut self) {
        self.items.push(LineItemForm::new());
    }

    /// Remove a row; the form always keeps at least one
    pub fn remove_item(&mut self, index: usize) {
        if self.items.len() > 1 && index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Live preview total over the current rows
    pub fn live_total(&self) -> f64 {
        line_item_total(&self.parsed_items())
    }

    /// Rows with their numeric fields coerced
    pub fn parsed_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem {
                description: item.description.trim().to_string(),
                quantity: item.parsed_quantity(),
                rate: item.parsed_rate(),
            })
            .collect()
    }

    /// Build the creation request. The currency stays unset so the backend
    /// applies the workspace default.
    pub fn to_request(&self) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            client: self.client.trim().to_string(),
            email: self.email.trim().to_string(),
            due_date: self.due_date.clone(),
            currency: None,
            items: self.parsed_items(),
        }
    }
}

impl Default for InvoiceFormState {
    fn default() -> Self {
        Self::new()
    }
}

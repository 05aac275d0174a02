//! # Calendar State Module
//!
//! Month navigation, the loaded grid, the selected day, and the
//! add-appointment form.

use chrono::Datelike;
use shared::{date_key, CalendarMonth, CreateAppointmentRequest};

/// Calendar-specific state for month navigation and display
pub struct CalendarState {
    /// Currently selected month (1-12)
    pub selected_month: u32,

    /// Currently selected year
    pub selected_year: i32,

    /// Date key of the selected day
    pub selected_date: String,

    /// Month grid from the backend, if loaded
    pub month: Option<CalendarMonth>,

    pub show_add_modal: bool,

    pub form: AppointmentFormState,
}

impl CalendarState {
    /// Create new calendar state focused on the current month, with today
    /// selected
    pub fn new() -> Self {
        let now = chrono::Local::now();
        Self {
            selected_month: now.month(),
            selected_year: now.year(),
            selected_date: date_key(now.year(), now.month(), now.day()),
            month: None,
            show_add_modal: false,
            form: AppointmentFormState::new(),
        }
    }

    /// Today's date key
    pub fn today_key(&self) -> String {
        let now = chrono::Local::now();
        date_key(now.year(), now.month(), now.day())
    }

    /// Navigate to the previous month. The grid is stale until reloaded.
    pub fn navigate_to_previous_month(&mut self) {
        if self.selected_month == 1 {
            self.selected_month = 12;
            self.selected_year -= 1;
        } else {
            self.selected_month -= 1;
        }
        self.month = None;
    }

    /// Navigate to the next month. The grid is stale until reloaded.
    pub fn navigate_to_next_month(&mut self) {
        if self.selected_month == 12 {
            self.selected_month = 1;
            self.selected_year += 1;
        } else {
            self.selected_month += 1;
        }
        self.month = None;
    }

    /// Jump back to the current month and select today
    pub fn go_to_today(&mut self) {
        let now = chrono::Local::now();
        let stale = self.selected_month != now.month() || self.selected_year != now.year();
        self.selected_month = now.month();
        self.selected_year = now.year();
        self.selected_date = self.today_key();
        if stale {
            self.month = None;
        }
    }

    /// Select a day cell
    pub fn select_day(&mut self, key: &str) {
        self.selected_date = key.to_string();
    }

    /// Install a freshly loaded grid
    pub fn set_month(&mut self, month: CalendarMonth) {
        self.month = Some(month);
    }

    pub fn open_add_modal(&mut self) {
        self.form = AppointmentFormState::new();
        self.show_add_modal = true;
    }

    pub fn close_add_modal(&mut self) {
        self.show_add_modal = false;
    }
}

impl Default for CalendarState {
    fn default() -> Self {
        Self::new()
    }
}

/// The add-appointment form. Date comes from the selected day.
pub struct AppointmentFormState {
    pub title: String,
    pub time: String,
    pub client: String,
    pub notes: String,
}

impl AppointmentFormState {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            time: String::new(),
            client: String::new(),
            notes: String::new(),
        }
    }

    /// Title and time are the form's required fields
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.time.trim().is_empty()
    }

    pub fn to_request(&self, date: &str) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            date: date.to_string(),
            time: self.time.trim().to_string(),
            title: self.title.trim().to_string(),
            client: self.client.trim().to_string(),
            notes: self.notes.clone(),
        }
    }
}

impl Default for AppointmentFormState {
    fn default() -> Self {
        Self::new()
    }
}

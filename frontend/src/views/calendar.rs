//! Calendar page view model: the 42-cell grid with appointment dots, and
//! the day-detail panel for the selected date.

use chrono::Datelike;
use shared::parse_date_key;

use crate::state::CalendarState;
use crate::views::MONTH_NAMES;

/// Dots shown per cell before the count is truncated
const MAX_DOTS: usize = 3;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One cell of the rendered grid
pub struct DayCellView {
    pub date_key: String,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    /// Dot indicators, capped at three like the page design
    pub dot_count: usize,
    pub appointment_count: usize,
}

/// One appointment in the day-detail panel
pub struct AppointmentItemView {
    pub time: String,
    pub title: String,
    pub client: String,
    pub notes: String,
}

/// Everything the calendar page renders
pub struct CalendarView {
    /// Header, e.g. "February 2026"
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<DayCellView>,
    /// Day-panel heading, e.g. "Sunday, February 1, 2026"
    pub panel_heading: String,
    pub panel_appointments: Vec<AppointmentItemView>,
    pub panel_empty: bool,
}

/// Build the calendar page view from the loaded grid and selection.
/// With no grid loaded yet the cell list is empty and the panel just shows
/// the selected date.
pub fn build_calendar_view(state: &CalendarState) -> CalendarView {
    let today = state.today_key();

    let title = format!(
        "{} {}",
        MONTH_NAMES[state.selected_month as usize - 1],
        state.selected_year
    );

    let mut cells = Vec::new();
    let mut panel_appointments = Vec::new();

    if let Some(month) = &state.month {
        for cell in &month.days {
            cells.push(DayCellView {
                date_key: cell.date_key.clone(),
                day: cell.day,
                in_month: cell.in_month,
                is_today: cell.date_key == today,
                is_selected: cell.date_key == state.selected_date,
                dot_count: cell.appointments.len().min(MAX_DOTS),
                appointment_count: cell.appointments.len(),
            });

            if cell.date_key == state.selected_date {
                panel_appointments = cell
                    .appointments
                    .iter()
                    .map(|appointment| AppointmentItemView {
                        time: appointment.time.clone(),
                        title: appointment.title.clone(),
                        client: appointment.client.clone(),
                        notes: appointment.notes.clone(),
                    })
                    .collect();
            }
        }
    }

    CalendarView {
        title,
        weekdays: WEEKDAY_LABELS,
        cells,
        panel_heading: long_date_heading(&state.selected_date),
        panel_empty: panel_appointments.is_empty(),
        panel_appointments,
    }
}

/// "Sunday, February 1, 2026" for a date key; the raw key when unparseable
fn long_date_heading(date: &str) -> String {
    let Some((year, month, day)) = parse_date_key(date) else {
        return date.to_string();
    };
    let Some(parsed) = chrono::NaiveDate::from_ymd_opt(year, month, day) else {
        return date.to_string();
    };

    let weekday = match parsed.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    };

    format!("{}, {} {}, {}", weekday, MONTH_NAMES[month as usize - 1], day, year)
}

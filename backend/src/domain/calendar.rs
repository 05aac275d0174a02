//! Calendar domain logic for the appointment view.
//!
//! This module contains all business logic related to the month grid, date
//! calculations, and appointment organization by date. The UI only handles
//! presentation concerns; all calendar computations live here.

use anyhow::Result;
use chrono::Datelike;
use shared::{date_key, Appointment, CalendarDayCell, CalendarFocusDate, CalendarMonth};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::domain::appointment_service::AppointmentService;

/// Number of cells in a month view. Six full weeks keep the grid height
/// stable regardless of month length.
pub const GRID_CELLS: usize = 42;

/// Calendar service that handles all calendar-related business logic
#[derive(Clone)]
pub struct CalendarService {
    /// Current focus date for calendar navigation (month/year only).
    /// Kept in memory and not persisted to the database.
    current_focus_date: Arc<Mutex<CalendarFocusDate>>,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new() -> Self {
        Self {
            current_focus_date: Arc::new(Mutex::new(CalendarFocusDate::default())),
        }
    }

    /// Month view with appointments loaded for the whole 42-cell window,
    /// so cells from adjacent months carry their appointments too.
    pub async fn month_view(
        &self,
        month: u32,
        year: i32,
        appointments: &AppointmentService,
    ) -> Result<CalendarMonth> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("Invalid month: {}. Must be between 1 and 12", month);
        }

        let (start, end) = self.grid_range(month, year);
        debug!("Loading appointments for grid window {} .. {}", start, end);

        let in_window = appointments.list_in_range(&start, &end).await?;
        Ok(self.build_month_grid(month, year, in_window))
    }

    /// Build the 42-cell grid for a month: trailing days of the previous
    /// month, every day of the target month, then leading days of the next
    /// month until the grid is full.
    pub fn build_month_grid(
        &self,
        month: u32,
        year: i32,
        appointments: Vec<Appointment>,
    ) -> CalendarMonth {
        let days_in_month = self.days_in_month(month, year);
        let first_day = self.first_day_of_month(month, year);
        let index = self.index_by_date(&appointments);

        let mut days: Vec<CalendarDayCell> = Vec::with_capacity(GRID_CELLS);

        let cell = |y: i32, m: u32, d: u32, in_month: bool| {
            let key = date_key(y, m, d);
            let on_day = index.get(&key).cloned().unwrap_or_default();
            CalendarDayCell {
                date_key: key,
                day: d,
                in_month,
                appointments: on_day,
            }
        };

        // Trailing days of the previous month fill the slots before the 1st
        let (prev_month, prev_year) = self.previous_month(month, year);
        let prev_days = self.days_in_month(prev_month, prev_year);
        for slot in 0..first_day {
            let day = prev_days - first_day + slot + 1;
            days.push(cell(prev_year, prev_month, day, false));
        }

        for day in 1..=days_in_month {
            days.push(cell(year, month, day, true));
        }

        // Leading days of the next month complete the fixed 42 cells
        let (next_month, next_year) = self.next_month(month, year);
        let mut day = 1;
        while days.len() < GRID_CELLS {
            days.push(cell(next_year, next_month, day, false));
            day += 1;
        }

        CalendarMonth {
            month,
            year,
            days,
            first_day_of_week: first_day,
        }
    }

    /// Group appointments by date key, preserving input order within each
    /// group. Rebuilt wholesale whenever the list changes.
    pub fn index_by_date(&self, appointments: &[Appointment]) -> HashMap<String, Vec<Appointment>> {
        let mut index: HashMap<String, Vec<Appointment>> = HashMap::new();
        for appointment in appointments {
            index
                .entry(appointment.date.clone())
                .or_default()
                .push(appointment.clone());
        }
        index
    }

    /// Date keys of the first and last cell of a month's grid
    pub fn grid_range(&self, month: u32, year: i32) -> (String, String) {
        let days_in_month = self.days_in_month(month, year);
        let first_day = self.first_day_of_month(month, year);

        let start = if first_day == 0 {
            date_key(year, month, 1)
        } else {
            let (prev_month, prev_year) = self.previous_month(month, year);
            let prev_days = self.days_in_month(prev_month, prev_year);
            date_key(prev_year, prev_month, prev_days - first_day + 1)
        };

        let trailing = GRID_CELLS as u32 - first_day - days_in_month;
        let end = if trailing == 0 {
            date_key(year, month, days_in_month)
        } else {
            let (next_month, next_year) = self.next_month(month, year);
            date_key(next_year, next_month, trailing)
        };

        (start, end)
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the weekday of the first day of a month (0 = Sunday, 1 = Monday, ...)
    pub fn first_day_of_month(&self, month: u32, year: i32) -> u32 {
        if let Some(date) = chrono::NaiveDate::from_ymd_opt(year, month, 1) {
            // chrono's weekday(): Monday = 1, ..., Sunday = 7
            // Our format: Sunday = 0, Monday = 1, ..., Saturday = 6
            date.weekday().num_days_from_sunday()
        } else {
            // Invalid date, fallback to 0 (Sunday)
            0
        }
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Navigate to the previous month
    pub fn previous_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 1 {
            (12, current_year - 1)
        } else {
            (current_month - 1, current_year)
        }
    }

    /// Navigate to the next month
    pub fn next_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 12 {
            (1, current_year + 1)
        } else {
            (current_month + 1, current_year)
        }
    }

    /// Today's date key
    pub fn current_date_key(&self) -> String {
        let now = chrono::Local::now();
        date_key(now.year(), now.month(), now.day())
    }

    /// Get the current focus date for calendar navigation
    pub fn get_focus_date(&self) -> CalendarFocusDate {
        self.current_focus_date.lock().unwrap().clone()
    }

    /// Set the focus date for calendar navigation
    pub fn set_focus_date(&self, month: u32, year: i32) -> Result<CalendarFocusDate, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month: {}. Must be between 1 and 12", month));
        }

        let new_focus_date = CalendarFocusDate { month, year };

        {
            let mut focus_date = self.current_focus_date.lock().unwrap();
            *focus_date = new_focus_date.clone();
        }

        Ok(new_focus_date)
    }

    /// Move the focus one month back
    pub fn navigate_previous_month(&self) -> CalendarFocusDate {
        let current = self.get_focus_date();
        let (month, year) = self.previous_month(current.month, current.year);

        // previous_month always yields a valid month
        self.set_focus_date(month, year).unwrap()
    }

    /// Move the focus one month forward
    pub fn navigate_next_month(&self) -> CalendarFocusDate {
        let current = self.get_focus_date();
        let (month, year) = self.next_month(current.month, current.year);

        // next_month always yields a valid month
        self.set_focus_date(month, year).unwrap()
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

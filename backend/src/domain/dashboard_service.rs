use anyhow::Result;
use chrono::Datelike;
use std::sync::Arc;

use crate::storage::DbConnection;
use shared::{parse_date_key, DashboardSummary, InvoiceStatus, MonthlyRevenue};

/// How many invoices the activity feed shows
const RECENT_LIMIT: usize = 8;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Read-side aggregation for the dashboard page
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DbConnection>,
}

impl DashboardService {
    /// Create a new DashboardService
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    /// KPI summary relative to the current date
    pub async fn summary(&self) -> Result<DashboardSummary> {
        let now = chrono::Local::now();
        let today = shared::date_key(now.year(), now.month(), now.day());
        self.summary_as_of(&today, now.year()).await
    }

    /// KPI summary relative to an explicit reference date and chart year
    pub async fn summary_as_of(&self, today_key: &str, focus_year: i32) -> Result<DashboardSummary> {
        let invoices = self.db.list_invoices().await?;
        let appointments = self.db.list_appointments().await?;

        let mut total_revenue = 0.0;
        let mut outstanding = 0.0;
        let mut overdue = 0.0;
        let mut invoices_paid = 0;
        let mut invoices_outstanding = 0;

        let mut monthly_revenue: Vec<MonthlyRevenue> = (1..=12)
            .map(|month| MonthlyRevenue {
                month,
                label: MONTH_LABELS[month as usize - 1].to_string(),
                revenue: 0.0,
            })
            .collect();

        for invoice in &invoices {
            match invoice.status {
                InvoiceStatus::Paid => {
                    total_revenue += invoice.amount;
                    invoices_paid += 1;

                    if let Some((year, month, _)) = parse_date_key(&invoice.date) {
                        if year == focus_year {
                            monthly_revenue[month as usize - 1].revenue += invoice.amount;
                        }
                    }
                }
                InvoiceStatus::Pending | InvoiceStatus::Sent => {
                    outstanding += invoice.amount;
                    invoices_outstanding += 1;
                }
                InvoiceStatus::Overdue => {
                    overdue += invoice.amount;
                    invoices_outstanding += 1;
                }
                InvoiceStatus::Draft | InvoiceStatus::Cancelled => {}
            }
        }

        // Zero-padded date keys compare as dates
        let upcoming_appointments = appointments
            .iter()
            .filter(|appointment| appointment.date.as_str() >= today_key)
            .count() as u32;

        let recent_invoices = invoices.into_iter().take(RECENT_LIMIT).collect();

        Ok(DashboardSummary {
            total_revenue,
            outstanding,
            overdue,
            invoices_paid,
            invoices_outstanding,
            upcoming_appointments,
            monthly_revenue,
            recent_invoices,
        })
    }
}

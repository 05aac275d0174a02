//! Dashboard view model: KPI tiles, the monthly revenue chart data, and the
//! recent-activity rows.

use shared::{CurrencyCode, DashboardSummary};

use crate::views::{format_currency, format_month_day};

/// One KPI tile
pub struct KpiTileView {
    pub label: &'static str,
    pub value: String,
}

/// One bar of the monthly revenue chart
pub struct MonthBarView {
    pub label: String,
    pub revenue: f64,
    pub revenue_label: String,
}

/// One row of the recent-activity list
pub struct ActivityRowView {
    pub date_label: String,
    pub description: String,
    pub status_label: &'static str,
    pub amount_label: String,
}

/// Everything the dashboard renders
pub struct DashboardView {
    pub tiles: Vec<KpiTileView>,
    pub monthly: Vec<MonthBarView>,
    /// Upper bound of the chart's y axis
    pub chart_max: f64,
    pub recent: Vec<ActivityRowView>,
}

/// Build the dashboard view from the aggregated summary
pub fn build_dashboard(summary: &DashboardSummary, currency: CurrencyCode) -> DashboardView {
    let tiles = vec![
        KpiTileView {
            label: "Total Revenue",
            value: format_currency(summary.total_revenue, currency),
        },
        KpiTileView {
            label: "Outstanding",
            value: format_currency(summary.outstanding, currency),
        },
        KpiTileView {
            label: "Overdue",
            value: format_currency(summary.overdue, currency),
        },
        KpiTileView {
            label: "Invoices Paid",
            value: summary.invoices_paid.to_string(),
        },
        KpiTileView {
            label: "Upcoming Appointments",
            value: summary.upcoming_appointments.to_string(),
        },
    ];

    let monthly: Vec<MonthBarView> = summary
        .monthly_revenue
        .iter()
        .map(|slot| MonthBarView {
            label: slot.label.clone(),
            revenue: slot.revenue,
            revenue_label: format_currency(slot.revenue, currency),
        })
        .collect();

    let chart_max = summary
        .monthly_revenue
        .iter()
        .map(|slot| slot.revenue)
        .fold(0.0, f64::max);

    let recent: Vec<ActivityRowView> = summary
        .recent_invoices
        .iter()
        .map(|invoice| {
            let work = invoice
                .items
                .first()
                .map(|item| item.description.clone())
                .unwrap_or_else(|| invoice.number.clone());
            ActivityRowView {
                date_label: format_month_day(&invoice.date),
                description: format!("{} for {}", work, invoice.client),
                status_label: invoice.status.label(),
                amount_label: format_currency(invoice.amount, currency),
            }
        })
        .collect();

    DashboardView {
        tiles,
        monthly,
        chart_max,
        recent,
    }
}

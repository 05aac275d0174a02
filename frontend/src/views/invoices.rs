//! Invoice page view model: header stats, the filtered table, and the
//! creation form's live total.

use shared::{CurrencyCode, Invoice, InvoiceStatus};

use crate::state::InvoicePageState;
use crate::views::{format_currency, format_month_day};

/// One row of the invoice table
pub struct InvoiceRow {
    pub number: String,
    pub client: String,
    pub email: String,
    pub date_label: String,
    pub due_label: String,
    pub amount_label: String,
    pub status: InvoiceStatus,
    pub status_label: &'static str,
}

/// Header sums, formatted
pub struct InvoiceStatsView {
    pub total_invoiced: String,
    pub paid: String,
    pub pending: String,
    pub overdue: String,
}

/// Everything the invoices page renders
pub struct InvoiceTableView {
    pub stats: InvoiceStatsView,
    pub rows: Vec<InvoiceRow>,
    /// True when search/filter leaves nothing to show
    pub empty: bool,
    /// Live total of the creation form
    pub form_total_label: String,
}

/// One line item of the detail modal
pub struct LineItemRow {
    pub description: String,
    pub quantity: u32,
    pub rate_label: String,
    pub total_label: String,
}

/// The invoice detail modal
pub struct InvoiceDetailView {
    pub number: String,
    pub client: String,
    pub email: String,
    pub date: String,
    pub due_date: String,
    pub status: InvoiceStatus,
    pub status_label: &'static str,
    pub item_rows: Vec<LineItemRow>,
    pub total_label: String,
}

/// Build the detail modal for one invoice
pub fn build_invoice_detail(invoice: &Invoice, currency: CurrencyCode) -> InvoiceDetailView {
    InvoiceDetailView {
        number: invoice.number.clone(),
        client: invoice.client.clone(),
        email: invoice.email.clone(),
        date: invoice.date.clone(),
        due_date: invoice.due_date.clone(),
        status: invoice.status,
        status_label: invoice.status.label(),
        item_rows: invoice
            .items
            .iter()
            .map(|item| LineItemRow {
                description: item.description.clone(),
                quantity: item.quantity,
                rate_label: format_currency(item.rate, currency),
                total_label: format_currency(item.total(), currency),
            })
            .collect(),
        total_label: format_currency(invoice.amount, currency),
    }
}

/// Build the invoices page view. Stats cover the whole cache; search and
/// status filter narrow only the rows.
pub fn build_invoice_table(
    invoices: &[Invoice],
    state: &InvoicePageState,
    currency: CurrencyCode,
) -> InvoiceTableView {
    let mut total_invoiced = 0.0;
    let mut paid = 0.0;
    let mut pending = 0.0;
    let mut overdue = 0.0;

    for invoice in invoices {
        total_invoiced += invoice.amount;
        match invoice.status {
            InvoiceStatus::Paid => paid += invoice.amount,
            InvoiceStatus::Pending | InvoiceStatus::Sent => pending += invoice.amount,
            InvoiceStatus::Overdue => overdue += invoice.amount,
            InvoiceStatus::Draft | InvoiceStatus::Cancelled => {}
        }
    }

    let needle = state.search_query.to_lowercase();
    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .filter(|invoice| {
            needle.is_empty()
                || invoice.number.to_lowercase().contains(&needle)
                || invoice.client.to_lowercase().contains(&needle)
        })
        .filter(|invoice| match state.status_filter {
            Some(status) => invoice.status == status,
            None => true,
        })
        .map(|invoice| InvoiceRow {
            number: invoice.number.clone(),
            client: invoice.client.clone(),
            email: invoice.email.clone(),
            date_label: format_month_day(&invoice.date),
            due_label: format_month_day(&invoice.due_date),
            amount_label: format_currency(invoice.amount, currency),
            status: invoice.status,
            status_label: invoice.status.label(),
        })
        .collect();

    InvoiceTableView {
        stats: InvoiceStatsView {
            total_invoiced: format_currency(total_invoiced, currency),
            paid: format_currency(paid, currency),
            pending: format_currency(pending, currency),
            overdue: format_currency(overdue, currency),
        },
        empty: rows.is_empty(),
        rows,
        form_total_label: format_currency(state.form.live_total(), currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::LineItem;

    fn invoice(number: &str, client: &str, amount: f64, status: InvoiceStatus) -> Invoice {
        Invoice {
            number: number.to_string(),
            client: client.to_string(),
            email: "billing@acme.com".to_string(),
            date: "2026-02-10".to_string(),
            due_date: "2026-03-10".to_string(),
            amount,
            status,
            currency: CurrencyCode::Usd,
            items: vec![LineItem {
                description: "Work".to_string(),
                quantity: 1,
                rate: amount,
            }],
            created_at: "2026-02-10T09:00:00+00:00".to_string(),
            updated_at: "2026-02-10T09:00:00+00:00".to_string(),
        }
    }

    fn sample() -> Vec<Invoice> {
        vec![
            invoice("INV-001", "Acme Corp", 8500.0, InvoiceStatus::Paid),
            invoice("INV-002", "Beta Industries", 4200.0, InvoiceStatus::Sent),
            invoice("INV-003", "Omega Ltd", 12000.0, InvoiceStatus::Overdue),
        ]
    }

    #[test]
    fn test_stats_cover_full_cache() {
        let mut state = InvoicePageState::new();
        state.search_query = "acme".to_string();

        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);

        // Rows are filtered, stats are not
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.stats.total_invoiced, "$24,700.00");
        assert_eq!(view.stats.paid, "$8,500.00");
        assert_eq!(view.stats.pending, "$4,200.00");
        assert_eq!(view.stats.overdue, "$12,000.00");
    }

    #[test]
    fn test_search_matches_number_and_client() {
        let mut state = InvoicePageState::new();

        state.search_query = "inv-003".to_string();
        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].client, "Omega Ltd");

        state.search_query = "beta".to_string();
        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].number, "INV-002");
    }

    #[test]
    fn test_status_filter() {
        let mut state = InvoicePageState::new();
        state.status_filter = Some(InvoiceStatus::Overdue);

        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].status_label, "Overdue");
    }

    #[test]
    fn test_empty_flag_and_labels() {
        let mut state = InvoicePageState::new();
        state.search_query = "nothing matches".to_string();

        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);
        assert!(view.empty);

        let state = InvoicePageState::new();
        let view = build_invoice_table(&sample(), &state, CurrencyCode::Usd);
        assert_eq!(view.rows[0].date_label, "Feb 10");
        assert_eq!(view.rows[0].due_label, "Mar 10");
        assert_eq!(view.rows[0].amount_label, "$8,500.00");
    }

    #[test]
    fn test_invoice_detail_rows() {
        let mut multi = invoice("INV-007", "NovaCraft", 750.0, InvoiceStatus::Sent);
        multi.items = vec![
            LineItem {
                description: "UI/UX Audit".to_string(),
                quantity: 2,
                rate: 300.0,
            },
            LineItem {
                description: "Prototype Build".to_string(),
                quantity: 1,
                rate: 150.0,
            },
        ];

        let detail = build_invoice_detail(&multi, CurrencyCode::Usd);
        assert_eq!(detail.status_label, "Sent");
        assert_eq!(detail.item_rows.len(), 2);
        assert_eq!(detail.item_rows[0].quantity, 2);
        assert_eq!(detail.item_rows[0].rate_label, "$300.00");
        assert_eq!(detail.item_rows[0].total_label, "$600.00");
        assert_eq!(detail.total_label, "$750.00");
    }

    #[test]
    fn test_form_total_follows_form_state() {
        let mut state = InvoicePageState::new();
        state.form.items[0].quantity = "2".to_string();
        state.form.items[0].rate = "300".to_string();

        let view = build_invoice_table(&[], &state, CurrencyCode::Usd);
        assert_eq!(view.form_total_label, "$600.00");
    }
}

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::invoices::InvoiceListQuery;
use crate::domain::{now_rfc3339, publish_change, today_key, EventSender};
use crate::storage::DbConnection;
use shared::{
    line_item_total, parse_date_key, ChangeOp, ChangeTable, CreateInvoiceRequest, Invoice,
    InvoiceListResponse, InvoiceResponse, InvoiceStats, InvoiceStatus,
};

/// Service for managing invoices
#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DbConnection>,
    events: EventSender,
}

impl InvoiceService {
    /// Create a new InvoiceService
    pub fn new(db: Arc<DbConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Create a new invoice as a draft.
    ///
    /// The number is allocated server-side and the stored amount is computed
    /// from the line items, so it always equals their sum.
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<InvoiceResponse> {
        info!(
            "Creating invoice for {} with {} line items",
            request.client,
            request.items.len()
        );

        self.validate_create_request(&request)?;

        // Fall back to the workspace currency when the form leaves it unset
        let currency = match request.currency {
            Some(code) => code,
            None => self
                .db
                .get_profile()
                .await?
                .map(|profile| profile.currency)
                .unwrap_or_default(),
        };

        let number = self.db.next_invoice_number().await?;
        let timestamp = now_rfc3339();
        let amount = line_item_total(&request.items);

        let invoice = Invoice {
            number: number.clone(),
            client: request.client.trim().to_string(),
            email: request.email.trim().to_string(),
            date: today_key(),
            due_date: request.due_date,
            amount,
            status: InvoiceStatus::Draft,
            currency,
            items: request.items,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        self.db.store_invoice(&invoice).await?;

        publish_change(
            &self.events,
            ChangeTable::Invoices,
            ChangeOp::Created,
            &invoice.number,
            serde_json::to_value(&invoice).ok(),
        );

        info!("Created invoice {} totalling {:.2}", number, amount);

        Ok(InvoiceResponse {
            invoice,
            success_message: format!("Invoice {} created", number),
        })
    }

    /// List invoices, optionally narrowed by search text and status
    pub async fn list_invoices(&self, query: InvoiceListQuery) -> Result<InvoiceListResponse> {
        let mut invoices = self.db.list_invoices().await?;

        if let Some(q) = query.q.as_deref() {
            let needle = q.to_lowercase();
            invoices.retain(|invoice| {
                invoice.number.to_lowercase().contains(&needle)
                    || invoice.client.to_lowercase().contains(&needle)
            });
        }

        if let Some(status) = query.status {
            invoices.retain(|invoice| invoice.status == status);
        }

        Ok(InvoiceListResponse { invoices })
    }

    /// Get an invoice by number
    pub async fn get_invoice(&self, number: &str) -> Result<Option<Invoice>> {
        let invoice = self.db.get_invoice(number).await?;

        if invoice.is_none() {
            warn!("Invoice not found: {}", number);
        }

        Ok(invoice)
    }

    /// Set an invoice's status. Any status may be set from any other; the
    /// enum is the only constraint.
    pub async fn set_status(&self, number: &str, status: InvoiceStatus) -> Result<InvoiceResponse> {
        info!("Setting invoice {} status to {}", number, status);

        let mut invoice = self
            .db
            .get_invoice(number)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Invoice not found: {}", number))?;

        let updated_at = now_rfc3339();
        self.db.update_invoice_status(number, status, &updated_at).await?;

        invoice.status = status;
        invoice.updated_at = updated_at;

        publish_change(
            &self.events,
            ChangeTable::Invoices,
            ChangeOp::Updated,
            number,
            serde_json::to_value(&invoice).ok(),
        );

        Ok(InvoiceResponse {
            invoice,
            success_message: format!("Invoice {} marked {}", number, status.label().to_lowercase()),
        })
    }

    /// Mark an invoice sent
    pub async fn mark_sent(&self, number: &str) -> Result<InvoiceResponse> {
        self.set_status(number, InvoiceStatus::Sent).await
    }

    /// Delete an invoice
    pub async fn delete_invoice(&self, number: &str) -> Result<()> {
        info!("Deleting invoice {}", number);

        let deleted = self.db.delete_invoice(number).await?;
        if !deleted {
            return Err(anyhow::anyhow!("Invoice not found: {}", number));
        }

        publish_change(&self.events, ChangeTable::Invoices, ChangeOp::Deleted, number, None);

        Ok(())
    }

    /// Header sums for the invoices page
    pub async fn stats(&self) -> Result<InvoiceStats> {
        let invoices = self.db.list_invoices().await?;

        let mut stats = InvoiceStats {
            total_invoiced: 0.0,
            paid: 0.0,
            pending: 0.0,
            overdue: 0.0,
        };

        for invoice in &invoices {
            stats.total_invoiced += invoice.amount;
            match invoice.status {
                InvoiceStatus::Paid => stats.paid += invoice.amount,
                InvoiceStatus::Pending | InvoiceStatus::Sent => stats.pending += invoice.amount,
                InvoiceStatus::Overdue => stats.overdue += invoice.amount,
                InvoiceStatus::Draft | InvoiceStatus::Cancelled => {}
            }
        }

        Ok(stats)
    }

    fn validate_create_request(&self, request: &CreateInvoiceRequest) -> Result<()> {
        if request.client.trim().is_empty() {
            return Err(anyhow::anyhow!("Client name cannot be empty"));
        }

        if !request.email.contains('@') {
            return Err(anyhow::anyhow!("Client email is not valid"));
        }

        if parse_date_key(&request.due_date).is_none() {
            return Err(anyhow::anyhow!("Due date must be in YYYY-MM-DD format"));
        }

        if request.items.is_empty() {
            return Err(anyhow::anyhow!("Invoice needs at least one line item"));
        }

        for item in &request.items {
            if item.description.trim().is_empty() {
                return Err(anyhow::anyhow!("Line item description cannot be empty"));
            }
            if item.quantity == 0 {
                return Err(anyhow::anyhow!("Line item quantity must be positive"));
            }
            if !item.rate.is_finite() || item.rate < 0.0 {
                return Err(anyhow::anyhow!("Line item rate cannot be negative"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event_channel;
    use shared::{CurrencyCode, LineItem};

    async fn setup_test() -> InvoiceService {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to create test database"));
        InvoiceService::new(db, event_channel())
    }

    fn create_request(client: &str, items: Vec<LineItem>) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            client: client.to_string(),
            email: "billing@acme.com".to_string(),
            due_date: "2026-03-10".to_string(),
            currency: Some(CurrencyCode::Usd),
            items,
        }
    }

    fn item(description: &str, quantity: u32, rate: f64) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity,
            rate,
        }
    }

    #[tokio::test]
    async fn test_create_invoice_computes_total_and_number() {
        let service = setup_test().await;

        let response = service
            .create_invoice(create_request(
                "Acme Corp",
                vec![item("UI/UX Audit", 2, 300.0), item("Prototype Build", 1, 150.0)],
            ))
            .await
            .expect("Failed to create invoice");

        assert_eq!(response.invoice.number, "INV-001");
        assert_eq!(response.invoice.amount, 750.0);
        assert_eq!(response.invoice.status, InvoiceStatus::Draft);
        assert_eq!(response.success_message, "Invoice INV-001 created");

        // Numbers keep counting up
        let response = service
            .create_invoice(create_request("Beta Industries", vec![item("Consulting", 14, 300.0)]))
            .await
            .unwrap();
        assert_eq!(response.invoice.number, "INV-002");
        assert_eq!(response.invoice.amount, 4200.0);
    }

    #[tokio::test]
    async fn test_create_invoice_falls_back_to_workspace_currency() {
        let service = setup_test().await;

        let mut request = create_request("Acme Corp", vec![item("Work", 1, 100.0)]);
        request.currency = None;

        let response = service.create_invoice(request).await.unwrap();
        // No profile written yet, so the default currency applies
        assert_eq!(response.invoice.currency, CurrencyCode::Usd);
    }

    #[tokio::test]
    async fn test_create_invoice_validation() {
        let service = setup_test().await;

        // Empty client
        let result = service
            .create_invoice(create_request("  ", vec![item("Work", 1, 100.0)]))
            .await;
        assert!(result.is_err());

        // Bad email
        let mut request = create_request("Acme Corp", vec![item("Work", 1, 100.0)]);
        request.email = "not-an-email".to_string();
        assert!(service.create_invoice(request).await.is_err());

        // Bad due date
        let mut request = create_request("Acme Corp", vec![item("Work", 1, 100.0)]);
        request.due_date = "03/10/2026".to_string();
        assert!(service.create_invoice(request).await.is_err());

        // No items
        assert!(service.create_invoice(create_request("Acme Corp", vec![])).await.is_err());

        // Zero quantity
        let result = service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 0, 100.0)]))
            .await;
        assert!(result.is_err());

        // Negative rate
        let result = service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, -5.0)]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_invoices_search_and_filter() {
        let service = setup_test().await;

        service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, 100.0)]))
            .await
            .unwrap();
        service
            .create_invoice(create_request("Sunrise Bakery", vec![item("Logo", 1, 2100.0)]))
            .await
            .unwrap();
        service.mark_sent("INV-002").await.unwrap();

        // Search by client, case-insensitive
        let result = service
            .list_invoices(InvoiceListQuery {
                q: Some("sunrise".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(result.invoices.len(), 1);
        assert_eq!(result.invoices[0].client, "Sunrise Bakery");

        // Search by number
        let result = service
            .list_invoices(InvoiceListQuery {
                q: Some("inv-001".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(result.invoices.len(), 1);

        // Filter by status
        let result = service
            .list_invoices(InvoiceListQuery {
                q: None,
                status: Some(InvoiceStatus::Sent),
            })
            .await
            .unwrap();
        assert_eq!(result.invoices.len(), 1);
        assert_eq!(result.invoices[0].number, "INV-002");

        // No match
        let result = service
            .list_invoices(InvoiceListQuery {
                q: Some("omega".to_string()),
                status: None,
            })
            .await
            .unwrap();
        assert!(result.invoices.is_empty());
    }

    #[tokio::test]
    async fn test_any_status_reachable_from_any_other() {
        let service = setup_test().await;

        service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, 100.0)]))
            .await
            .unwrap();

        for from in InvoiceStatus::ALL {
            service.set_status("INV-001", from).await.unwrap();
            for to in InvoiceStatus::ALL {
                let response = service.set_status("INV-001", to).await.unwrap();
                assert_eq!(response.invoice.status, to);
            }
        }
    }

    #[tokio::test]
    async fn test_set_status_not_found() {
        let service = setup_test().await;

        let result = service.set_status("INV-404", InvoiceStatus::Paid).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_status_change_publishes_update_event() {
        let service = setup_test().await;

        service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, 100.0)]))
            .await
            .unwrap();

        let mut rx = service.events.subscribe();
        service.set_status("INV-001", InvoiceStatus::Paid).await.unwrap();

        let event = rx.try_recv().expect("Expected a change event");
        assert_eq!(event.table, ChangeTable::Invoices);
        assert_eq!(event.op, ChangeOp::Updated);
        assert_eq!(event.id, "INV-001");

        let record: Invoice = serde_json::from_value(event.record.unwrap()).unwrap();
        assert_eq!(record.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let service = setup_test().await;

        service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, 100.0)]))
            .await
            .unwrap();

        let mut rx = service.events.subscribe();
        service.delete_invoice("INV-001").await.expect("Failed to delete");

        assert!(service.get_invoice("INV-001").await.unwrap().is_none());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.op, ChangeOp::Deleted);
        assert_eq!(event.id, "INV-001");

        assert!(service.delete_invoice("INV-001").await.is_err());
    }

    #[tokio::test]
    async fn test_stats_bucket_amounts_by_status() {
        let service = setup_test().await;

        service
            .create_invoice(create_request("Acme Corp", vec![item("Work", 1, 8500.0)]))
            .await
            .unwrap();
        service
            .create_invoice(create_request("Beta Industries", vec![item("Consulting", 1, 4200.0)]))
            .await
            .unwrap();
        service
            .create_invoice(create_request("Omega Ltd", vec![item("Package", 1, 12000.0)]))
            .await
            .unwrap();
        service
            .create_invoice(create_request("Delta Co", vec![item("Campaign", 1, 6750.0)]))
            .await
            .unwrap();

        service.set_status("INV-001", InvoiceStatus::Paid).await.unwrap();
        service.set_status("INV-002", InvoiceStatus::Pending).await.unwrap();
        service.set_status("INV-003", InvoiceStatus::Overdue).await.unwrap();
        service.set_status("INV-004", InvoiceStatus::Sent).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_invoiced, 31450.0);
        assert_eq!(stats.paid, 8500.0);
        assert_eq!(stats.pending, 10950.0); // pending + sent
        assert_eq!(stats.overdue, 12000.0);
    }
}

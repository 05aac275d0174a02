use anyhow::Result;
use sqlx::Row;
use std::collections::HashMap;

use super::db::DbConnection;
use shared::{Invoice, InvoiceStatus, LineItem};

impl DbConnection {
    /// Allocate the next invoice number (`INV-001`, `INV-002`, ...).
    ///
    /// Backed by a single-row counter table so concurrent creations never
    /// hand out the same number.
    pub async fn next_invoice_number(&self) -> Result<String> {
        sqlx::query("INSERT OR IGNORE INTO invoice_counter (id, next_number) VALUES (1, 1)")
            .execute(self.pool())
            .await?;

        let row = sqlx::query(
            r#"
            UPDATE invoice_counter
            SET next_number = next_number + 1
            WHERE id = 1
            RETURNING next_number - 1 AS allocated
            "#,
        )
        .fetch_one(self.pool())
        .await?;

        let allocated: i64 = row.get("allocated");
        Ok(format!("INV-{:03}", allocated))
    }

    /// Store an invoice and its line items
    pub async fn store_invoice(&self, invoice: &Invoice) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (number, client, email, date, due_date, amount, status, currency, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.number)
        .bind(&invoice.client)
        .bind(&invoice.email)
        .bind(&invoice.date)
        .bind(&invoice.due_date)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.currency.as_str())
        .bind(&invoice.created_at)
        .bind(&invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in invoice.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_number, description, quantity, rate, position)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&invoice.number)
            .bind(&item.description)
            .bind(item.quantity as i64)
            .bind(item.rate)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get an invoice by number, including its line items
    pub async fn get_invoice(&self, number: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query(
            r#"
            SELECT number, client, email, date, due_date, amount, status, currency, created_at, updated_at
            FROM invoices
            WHERE number = ?
            "#,
        )
        .bind(number)
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.list_invoice_items(&[number.to_string()]).await?;
        let mut invoice = invoice_from_row(&row)?;
        invoice.items = items.get(number).cloned().unwrap_or_default();
        Ok(Some(invoice))
    }

    /// List all invoices with their line items, newest first
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query(
            r#"
            SELECT number, client, email, date, due_date, amount, status, currency, created_at, updated_at
            FROM invoices
            ORDER BY ROWID DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        let numbers: Vec<String> = rows.iter().map(|row| row.get("number")).collect();
        let mut items_by_number = self.list_invoice_items(&numbers).await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut invoice = invoice_from_row(row)?;
            invoice.items = items_by_number.remove(&invoice.number).unwrap_or_default();
            invoices.push(invoice);
        }

        Ok(invoices)
    }

    /// Update the status of an invoice. Returns false if no such invoice.
    pub async fn update_invoice_status(
        &self,
        number: &str,
        status: InvoiceStatus,
        updated_at: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET status = ?, updated_at = ?
            WHERE number = ?
            "#,
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(number)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an invoice and its line items. Returns false if no such invoice.
    pub async fn delete_invoice(&self, number: &str) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_number = ?")
            .bind(number)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM invoices WHERE number = ?")
            .bind(number)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch line items for the given invoice numbers, grouped by number and
    /// ordered by their position on the invoice
    async fn list_invoice_items(
        &self,
        numbers: &[String],
    ) -> Result<HashMap<String, Vec<LineItem>>> {
        if numbers.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = numbers.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query_str = format!(
            "SELECT invoice_number, description, quantity, rate
             FROM invoice_items
             WHERE invoice_number IN ({})
             ORDER BY invoice_number, position",
            placeholders
        );

        let mut query = sqlx::query(&query_str);
        for number in numbers {
            query = query.bind(number);
        }

        let rows = query.fetch_all(self.pool()).await?;

        let mut grouped: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in &rows {
            let number: String = row.get("invoice_number");
            grouped.entry(number).or_default().push(LineItem {
                description: row.get("description"),
                quantity: row.get::<i64, _>("quantity") as u32,
                rate: row.get("rate"),
            });
        }

        Ok(grouped)
    }
}

fn invoice_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Invoice> {
    let status: String = row.get("status");
    let currency: String = row.get("currency");
    Ok(Invoice {
        number: row.get("number"),
        client: row.get("client"),
        email: row.get("email"),
        date: row.get("date"),
        due_date: row.get("due_date"),
        amount: row.get("amount"),
        status: status.parse()?,
        currency: currency.parse()?,
        items: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CurrencyCode;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn test_invoice(number: &str, client: &str, amount: f64, status: InvoiceStatus) -> Invoice {
        Invoice {
            number: number.to_string(),
            client: client.to_string(),
            email: "billing@acme.com".to_string(),
            date: "2026-02-10".to_string(),
            due_date: "2026-03-10".to_string(),
            amount,
            status,
            currency: CurrencyCode::Usd,
            items: vec![
                LineItem {
                    description: "Website Redesign".to_string(),
                    quantity: 1,
                    rate: amount,
                },
            ],
            created_at: "2026-02-10T09:00:00+00:00".to_string(),
            updated_at: "2026-02-10T09:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_next_invoice_number_is_sequential() {
        let db = setup_test().await;

        assert_eq!(db.next_invoice_number().await.unwrap(), "INV-001");
        assert_eq!(db.next_invoice_number().await.unwrap(), "INV-002");
        assert_eq!(db.next_invoice_number().await.unwrap(), "INV-003");
    }

    #[tokio::test]
    async fn test_next_invoice_number_pads_to_three_digits() {
        let db = setup_test().await;

        let mut last = String::new();
        for _ in 0..12 {
            last = db.next_invoice_number().await.unwrap();
        }
        assert_eq!(last, "INV-012");
    }

    #[tokio::test]
    async fn test_store_and_get_invoice() {
        let db = setup_test().await;

        let invoice = test_invoice("INV-001", "Acme Corp", 8500.0, InvoiceStatus::Draft);
        db.store_invoice(&invoice).await.expect("Failed to store invoice");

        let retrieved = db
            .get_invoice("INV-001")
            .await
            .expect("Failed to get invoice")
            .expect("Invoice should exist");

        assert_eq!(retrieved, invoice);
    }

    #[tokio::test]
    async fn test_get_nonexistent_invoice() {
        let db = setup_test().await;

        let invoice = db.get_invoice("INV-999").await.expect("Failed to query invoice");
        assert!(invoice.is_none());
    }

    #[tokio::test]
    async fn test_list_invoices_newest_first() {
        let db = setup_test().await;

        db.store_invoice(&test_invoice("INV-001", "Acme Corp", 8500.0, InvoiceStatus::Paid))
            .await
            .unwrap();
        db.store_invoice(&test_invoice("INV-002", "Beta Industries", 4200.0, InvoiceStatus::Sent))
            .await
            .unwrap();

        let invoices = db.list_invoices().await.expect("Failed to list invoices");
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].number, "INV-002");
        assert_eq!(invoices[1].number, "INV-001");
        assert_eq!(invoices[1].items.len(), 1);
    }

    #[tokio::test]
    async fn test_line_items_preserve_position_order() {
        let db = setup_test().await;

        let mut invoice = test_invoice("INV-001", "NovaCraft", 5200.0, InvoiceStatus::Draft);
        invoice.items = vec![
            LineItem {
                description: "UI/UX Audit".to_string(),
                quantity: 1,
                rate: 2200.0,
            },
            LineItem {
                description: "Prototype Build".to_string(),
                quantity: 1,
                rate: 3000.0,
            },
        ];
        db.store_invoice(&invoice).await.unwrap();

        let retrieved = db.get_invoice("INV-001").await.unwrap().unwrap();
        assert_eq!(retrieved.items[0].description, "UI/UX Audit");
        assert_eq!(retrieved.items[1].description, "Prototype Build");
    }

    #[tokio::test]
    async fn test_update_invoice_status() {
        let db = setup_test().await;

        db.store_invoice(&test_invoice("INV-001", "Acme Corp", 8500.0, InvoiceStatus::Draft))
            .await
            .unwrap();

        let updated = db
            .update_invoice_status("INV-001", InvoiceStatus::Sent, "2026-02-11T10:00:00+00:00")
            .await
            .expect("Failed to update status");
        assert!(updated);

        let invoice = db.get_invoice("INV-001").await.unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.updated_at, "2026-02-11T10:00:00+00:00");

        let missing = db
            .update_invoice_status("INV-999", InvoiceStatus::Paid, "2026-02-11T10:00:00+00:00")
            .await
            .unwrap();
        assert!(!missing);
    }

    #[tokio::test]
    async fn test_delete_invoice_removes_items() {
        let db = setup_test().await;

        db.store_invoice(&test_invoice("INV-001", "Acme Corp", 8500.0, InvoiceStatus::Draft))
            .await
            .unwrap();

        let deleted = db.delete_invoice("INV-001").await.expect("Failed to delete invoice");
        assert!(deleted);

        assert!(db.get_invoice("INV-001").await.unwrap().is_none());

        // Deleting again reports not found
        let deleted_again = db.delete_invoice("INV-001").await.unwrap();
        assert!(!deleted_again);
    }
}

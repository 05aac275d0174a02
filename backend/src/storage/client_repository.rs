use anyhow::Result;
use sqlx::Row;

use super::db::DbConnection;
use shared::Client;

// Spend aggregates are derived from the invoice table at read time; the
// clients table never stores them.
const CLIENT_COLUMNS: &str = r#"
    c.id, c.name, c.email, c.phone, c.company, c.location, c.status,
    c.starred, c.notes, c.created_at, c.updated_at,
    COALESCE((SELECT SUM(i.amount) FROM invoices i WHERE i.client = c.name AND i.status = 'paid'), 0.0) AS total_spent,
    (SELECT COUNT(*) FROM invoices i WHERE i.client = c.name) AS invoice_count,
    (SELECT MAX(i.date) FROM invoices i WHERE i.client = c.name) AS last_activity
"#;

impl DbConnection {
    /// Store a client record
    pub async fn store_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, company, location, status, starred, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(&client.location)
        .bind(client.status.as_str())
        .bind(client.starred)
        .bind(&client.notes)
        .bind(&client.created_at)
        .bind(&client.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get a client by ID, with derived spend aggregates
    pub async fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        let query_str = format!("SELECT {} FROM clients c WHERE c.id = ?", CLIENT_COLUMNS);
        let row = sqlx::query(&query_str)
            .bind(client_id)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(client_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// List all clients with derived spend aggregates, newest first
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let query_str = format!(
            "SELECT {} FROM clients c ORDER BY c.ROWID DESC",
            CLIENT_COLUMNS
        );
        let rows = sqlx::query(&query_str).fetch_all(self.pool()).await?;

        rows.iter().map(client_from_row).collect()
    }

    /// Update a client's contact fields and status
    pub async fn update_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, email = ?, phone = ?, company = ?, location = ?, status = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(&client.location)
        .bind(client.status.as_str())
        .bind(&client.notes)
        .bind(&client.updated_at)
        .bind(&client.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Set a client's starred flag. Returns false if no such client.
    pub async fn set_client_starred(
        &self,
        client_id: &str,
        starred: bool,
        updated_at: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET starred = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(starred)
        .bind(updated_at)
        .bind(client_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a client
    pub async fn delete_client(&self, client_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(client_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn client_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Client> {
    let status: String = row.get("status");
    Ok(Client {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        location: row.get("location"),
        status: status.parse()?,
        starred: row.get("starred"),
        notes: row.get("notes"),
        total_spent: row.get("total_spent"),
        invoice_count: row.get::<i64, _>("invoice_count") as u32,
        last_activity: row.get("last_activity"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

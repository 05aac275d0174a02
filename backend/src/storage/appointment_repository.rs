use anyhow::Result;
use sqlx::Row;

use super::db::DbConnection;
use shared::Appointment;

impl DbConnection {
    /// Store an appointment
    pub async fn store_appointment(&self, appointment: &Appointment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (id, date, time, title, client, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(&appointment.title)
        .bind(&appointment.client)
        .bind(&appointment.notes)
        .bind(&appointment.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// List all appointments in insertion order
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, time, title, client, notes, created_at
            FROM appointments
            ORDER BY ROWID ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(appointment_from_row).collect())
    }

    /// List appointments whose date key falls in [start, end], in insertion
    /// order. Date keys are zero-padded, so string comparison is date order.
    pub async fn list_appointments_in_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, time, title, client, notes, created_at
            FROM appointments
            WHERE date >= ? AND date <= ?
            ORDER BY ROWID ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(appointment_from_row).collect())
    }
}

fn appointment_from_row(row: &sqlx::sqlite::SqliteRow) -> Appointment {
    Appointment {
        id: row.get("id"),
        date: row.get("date"),
        time: row.get("time"),
        title: row.get("title"),
        client: row.get("client"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

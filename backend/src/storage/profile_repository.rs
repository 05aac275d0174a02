use anyhow::Result;
use sqlx::Row;

use super::db::DbConnection;
use shared::WorkspaceProfile;

impl DbConnection {
    /// Get the workspace profile, if one has been written yet
    pub async fn get_profile(&self) -> Result<Option<WorkspaceProfile>> {
        let row = sqlx::query(
            r#"
            SELECT full_name, email, role, company_name, industry, currency, timezone,
                   email_notifications, weekly_report, dark_mode, updated_at
            FROM profile
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => {
                let currency: String = row.get("currency");
                Ok(Some(WorkspaceProfile {
                    full_name: row.get("full_name"),
                    email: row.get("email"),
                    role: row.get("role"),
                    company_name: row.get("company_name"),
                    industry: row.get("industry"),
                    currency: currency.parse()?,
                    timezone: row.get("timezone"),
                    email_notifications: row.get("email_notifications"),
                    weekly_report: row.get("weekly_report"),
                    dark_mode: row.get("dark_mode"),
                    updated_at: row.get("updated_at"),
                }))
            }
            None => Ok(None),
        }
    }

    /// Write the workspace profile (single row, insert-or-replace)
    pub async fn upsert_profile(&self, profile: &WorkspaceProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO profile
                (id, full_name, email, role, company_name, industry, currency, timezone,
                 email_notifications, weekly_report, dark_mode, updated_at)
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.role)
        .bind(&profile.company_name)
        .bind(&profile.industry)
        .bind(profile.currency.as_str())
        .bind(&profile.timezone)
        .bind(profile.email_notifications)
        .bind(profile.weekly_report)
        .bind(profile.dark_mode)
        .bind(&profile.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CurrencyCode;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn test_profile() -> WorkspaceProfile {
        WorkspaceProfile {
            full_name: "Jordan Reyes".to_string(),
            email: "jordan@bizpulse.app".to_string(),
            role: "Admin".to_string(),
            company_name: "Reyes Consulting".to_string(),
            industry: "consulting".to_string(),
            currency: CurrencyCode::Usd,
            timezone: "UTC".to_string(),
            email_notifications: true,
            weekly_report: true,
            dark_mode: true,
            updated_at: "2026-02-01T09:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_profile_when_none_written() {
        let db = setup_test().await;

        let profile = db.get_profile().await.expect("Failed to get profile");
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get_profile() {
        let db = setup_test().await;

        let profile = test_profile();
        db.upsert_profile(&profile).await.expect("Failed to store profile");

        let retrieved = db.get_profile().await.unwrap().expect("Profile should exist");
        assert_eq!(retrieved, profile);
    }

    #[tokio::test]
    async fn test_upsert_replaces_single_row() {
        let db = setup_test().await;

        db.upsert_profile(&test_profile()).await.unwrap();

        let mut updated = test_profile();
        updated.currency = CurrencyCode::Eur;
        updated.dark_mode = false;
        updated.updated_at = "2026-02-02T09:00:00+00:00".to_string();
        db.upsert_profile(&updated).await.unwrap();

        let retrieved = db.get_profile().await.unwrap().unwrap();
        assert_eq!(retrieved.currency, CurrencyCode::Eur);
        assert!(!retrieved.dark_mode);
    }
}

use anyhow::Result;
use sqlx::Row;

use super::db::DbConnection;
use shared::ApiKeyInfo;

/// An API key as stored. The full key never leaves the backend except in the
/// one-time generation response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeyRecord {
    pub id: String,
    pub label: String,
    pub key_prefix: String,
    pub api_key: String,
    pub is_active: bool,
    pub last_used_at: Option<String>,
    pub created_at: String,
}

impl ApiKeyRecord {
    /// Strip the secret for list responses
    pub fn to_info(&self) -> ApiKeyInfo {
        ApiKeyInfo {
            id: self.id.clone(),
            label: self.label.clone(),
            key_prefix: self.key_prefix.clone(),
            is_active: self.is_active,
            last_used_at: self.last_used_at.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

impl DbConnection {
    /// Store a newly generated API key
    pub async fn store_api_key(&self, record: &ApiKeyRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, label, key_prefix, api_key, is_active, last_used_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.label)
        .bind(&record.key_prefix)
        .bind(&record.api_key)
        .bind(record.is_active)
        .bind(&record.last_used_at)
        .bind(&record.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// List all API keys, newest first
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeyRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, key_prefix, api_key, is_active, last_used_at, created_at
            FROM api_keys
            ORDER BY ROWID DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(api_key_from_row).collect())
    }

    /// Mark an API key revoked. Returns false if no such key.
    pub async fn revoke_api_key(&self, key_id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE api_keys SET is_active = 0 WHERE id = ?")
            .bind(key_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up an active key by its full secret value
    pub async fn find_active_api_key(&self, api_key: &str) -> Result<Option<ApiKeyRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, label, key_prefix, api_key, is_active, last_used_at, created_at
            FROM api_keys
            WHERE api_key = ? AND is_active = 1
            "#,
        )
        .bind(api_key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(api_key_from_row))
    }

    /// Stamp the last-used timestamp of a key
    pub async fn touch_api_key(&self, key_id: &str, used_at: &str) -> Result<()> {
        sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(used_at)
            .bind(key_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn api_key_from_row(row: &sqlx::sqlite::SqliteRow) -> ApiKeyRecord {
    ApiKeyRecord {
        id: row.get("id"),
        label: row.get("label"),
        key_prefix: row.get("key_prefix"),
        api_key: row.get("api_key"),
        is_active: row.get("is_active"),
        last_used_at: row.get("last_used_at"),
        created_at: row.get("created_at"),
    }
}

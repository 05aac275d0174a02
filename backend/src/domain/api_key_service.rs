use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::now_rfc3339;
use crate::storage::{ApiKeyRecord, DbConnection};
use shared::{ApiKeyListResponse, GenerateApiKeyRequest, GenerateApiKeyResponse, RevokeApiKeyResponse};

/// Length of the prefix kept for display after the secret is hidden
const PREFIX_LEN: usize = 12;

/// Service for workspace API keys used by external automations
#[derive(Clone)]
pub struct ApiKeyService {
    db: Arc<DbConnection>,
}

impl ApiKeyService {
    /// Create a new ApiKeyService
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    /// Generate a new API key. The full key is returned exactly once.
    pub async fn generate(&self, request: GenerateApiKeyRequest) -> Result<GenerateApiKeyResponse> {
        let label = request.label.trim().to_string();
        if label.is_empty() {
            return Err(anyhow::anyhow!("API key label cannot be empty"));
        }

        let api_key = format!("bpk_{}", Uuid::new_v4().simple());
        let record = ApiKeyRecord {
            id: Uuid::new_v4().to_string(),
            label,
            key_prefix: api_key.chars().take(PREFIX_LEN).collect(),
            api_key: api_key.clone(),
            is_active: true,
            last_used_at: None,
            created_at: now_rfc3339(),
        };

        self.db.store_api_key(&record).await?;

        info!("Generated API key {} ({})", record.key_prefix, record.label);

        Ok(GenerateApiKeyResponse {
            api_key,
            info: record.to_info(),
            success_message: "API key generated. Copy it now; it will not be shown again.".to_string(),
        })
    }

    /// List key metadata, newest first
    pub async fn list(&self) -> Result<ApiKeyListResponse> {
        let keys = self.db.list_api_keys().await?;
        Ok(ApiKeyListResponse {
            keys: keys.iter().map(ApiKeyRecord::to_info).collect(),
        })
    }

    /// Revoke a key. Revoked keys stay listed but no longer authenticate.
    pub async fn revoke(&self, key_id: &str) -> Result<RevokeApiKeyResponse> {
        let revoked = self.db.revoke_api_key(key_id).await?;
        if !revoked {
            return Err(anyhow::anyhow!("API key not found: {}", key_id));
        }

        info!("Revoked API key {}", key_id);

        Ok(RevokeApiKeyResponse {
            success_message: "API key revoked".to_string(),
        })
    }

    /// Authenticate a request key, stamping last-used on success
    pub async fn authenticate(&self, api_key: &str) -> Result<Option<ApiKeyRecord>> {
        let record = self.db.find_active_api_key(api_key).await?;

        match record {
            Some(record) => {
                self.db.touch_api_key(&record.id, &now_rfc3339()).await?;
                Ok(Some(record))
            }
            None => {
                warn!("Rejected request with unknown or revoked API key");
                Ok(None)
            }
        }
    }
}

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::{now_rfc3339, publish_change, EventSender};
use crate::storage::DbConnection;
use shared::{
    ChangeOp, ChangeTable, CurrencyCode, ProfileResponse, UpdateProfileRequest, WorkspaceProfile,
};

/// Service for the workspace settings page
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DbConnection>,
    events: EventSender,
}

impl SettingsService {
    /// Create a new SettingsService
    pub fn new(db: Arc<DbConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Get the workspace profile, writing the default row on first read
    pub async fn get_profile(&self) -> Result<WorkspaceProfile> {
        if let Some(profile) = self.db.get_profile().await? {
            return Ok(profile);
        }

        info!("No workspace profile yet, writing defaults");
        let profile = default_profile();
        self.db.upsert_profile(&profile).await?;
        Ok(profile)
    }

    /// Update the workspace profile
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<ProfileResponse> {
        info!("Updating workspace profile");

        if !request.email.is_empty() && !request.email.contains('@') {
            return Err(anyhow::anyhow!("Profile email is not valid"));
        }

        let profile = WorkspaceProfile {
            full_name: request.full_name,
            email: request.email,
            role: request.role,
            company_name: request.company_name,
            industry: request.industry,
            currency: request.currency,
            timezone: request.timezone,
            email_notifications: request.email_notifications,
            weekly_report: request.weekly_report,
            dark_mode: request.dark_mode,
            updated_at: now_rfc3339(),
        };

        self.db.upsert_profile(&profile).await?;

        publish_change(
            &self.events,
            ChangeTable::Profile,
            ChangeOp::Updated,
            "profile",
            serde_json::to_value(&profile).ok(),
        );

        Ok(ProfileResponse {
            profile,
            success_message: "Settings saved".to_string(),
        })
    }
}

fn default_profile() -> WorkspaceProfile {
    WorkspaceProfile {
        full_name: String::new(),
        email: String::new(),
        role: "Admin".to_string(),
        company_name: String::new(),
        industry: String::new(),
        currency: CurrencyCode::Usd,
        timezone: "UTC".to_string(),
        email_notifications: true,
        weekly_report: true,
        dark_mode: true,
        updated_at: now_rfc3339(),
    }
}

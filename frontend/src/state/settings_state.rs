//! # Settings Page State
//!
//! The profile form plus API key management state. The full key of a fresh
//! API key is held only until the user dismisses it.

use shared::{ApiKeyInfo, CurrencyCode, UpdateProfileRequest, WorkspaceProfile};

/// State for the settings page
pub struct SettingsState {
    pub profile_form: ProfileFormState,
    pub api_keys: Vec<ApiKeyInfo>,
    pub new_key_label: String,
    /// Full key returned by generation, shown once
    pub newly_created_key: Option<String>,
    pub generating_key: bool,
    pub saving: bool,
    pub saved: bool,
}

impl SettingsState {
    pub fn new() -> Self {
        Self {
            profile_form: ProfileFormState::new(),
            api_keys: Vec::new(),
            new_key_label: String::new(),
            newly_created_key: None,
            generating_key: false,
            saving: false,
            saved: false,
        }
    }

    /// Fill the form from a loaded profile
    pub fn load_profile(&mut self, profile: &WorkspaceProfile) {
        self.profile_form = ProfileFormState {
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            role: profile.role.clone(),
            company_name: profile.company_name.clone(),
            industry: profile.industry.clone(),
            currency: profile.currency,
            timezone: profile.timezone.clone(),
            email_notifications: profile.email_notifications,
            weekly_report: profile.weekly_report,
            dark_mode: profile.dark_mode,
        };
    }

    /// Install the key list from the backend
    pub fn set_api_keys(&mut self, keys: Vec<ApiKeyInfo>) {
        self.api_keys = keys;
    }

    /// Record a freshly generated key for its one-time display
    pub fn record_new_key(&mut self, api_key: String) {
        self.newly_created_key = Some(api_key);
        self.new_key_label.clear();
    }

    pub fn dismiss_new_key(&mut self) {
        self.newly_created_key = None;
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new()
    }
}

/// The profile/company/preferences form
pub struct ProfileFormState {
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub company_name: String,
    pub industry: String,
    pub currency: CurrencyCode,
    pub timezone: String,
    pub email_notifications: bool,
    pub weekly_report: bool,
    pub dark_mode: bool,
}

impl ProfileFormState {
    pub fn new() -> Self {
        Self {
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
        }
    }

    pub fn to_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.clone(),
            company_name: self.company_name.trim().to_string(),
            industry: self.industry.clone(),
            currency: self.currency,
            timezone: self.timezone.clone(),
            email_notifications: self.email_notifications,
            weekly_report: self.weekly_report,
            dark_mode: self.dark_mode,
        }
    }
}

impl Default for ProfileFormState {
    fn default() -> Self {
        Self::new()
    }
}

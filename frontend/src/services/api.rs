use futures::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::services::sync::{parse_event_block, FeedSignal};
use shared::{
    ApiKeyListResponse, AppointmentListResponse, AppointmentResponse, CalendarMonth,
    ClientListResponse, ClientResponse, ClientStats, CreateAppointmentRequest, CreateClientRequest,
    CreateInvoiceRequest, DashboardSummary, GenerateApiKeyRequest, GenerateApiKeyResponse, Invoice,
    InvoiceListResponse, InvoiceResponse, InvoiceStats, InvoiceStatus, ProfileResponse,
    RevokeApiKeyResponse, UpdateClientRequest, UpdateInvoiceStatusRequest, UpdateProfileRequest,
    WorkspaceProfile,
};

/// API client for communicating with the backend server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:3000".to_string())
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Test connection to the backend
    pub async fn test_connection(&self) -> Result<(), String> {
        match self
            .http
            .get(format!("{}/api/settings/profile", self.base_url))
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(format!("Connection failed: {}", e)),
        }
    }

    /// List invoices, optionally with search text and a status filter
    pub async fn get_invoices(
        &self,
        q: Option<&str>,
        status: Option<InvoiceStatus>,
    ) -> Result<InvoiceListResponse, String> {
        let mut url = format!("{}/api/invoices", self.base_url);
        let mut params = Vec::new();
        if let Some(q) = q {
            params.push(format!("q={}", q));
        }
        if let Some(status) = status {
            params.push(format!("status={}", status.as_str()));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }

        let response = self.http.get(&url).send().await.map_err(network_error)?;
        parse_response(response).await
    }

    /// Create a new invoice
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceResponse, String> {
        let response = self
            .http
            .post(format!("{}/api/invoices", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Get the invoice header stats
    pub async fn get_invoice_stats(&self) -> Result<InvoiceStats, String> {
        let response = self
            .http
            .get(format!("{}/api/invoices/stats", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Get one invoice by number
    pub async fn get_invoice(&self, number: &str) -> Result<Invoice, String> {
        let response = self
            .http
            .get(format!("{}/api/invoices/{}", self.base_url, number))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Set an invoice's status
    pub async fn set_invoice_status(
        &self,
        number: &str,
        status: InvoiceStatus,
    ) -> Result<InvoiceResponse, String> {
        let response = self
            .http
            .put(format!("{}/api/invoices/{}/status", self.base_url, number))
            .json(&UpdateInvoiceStatusRequest { status })
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Mark an invoice sent
    pub async fn send_invoice(&self, number: &str) -> Result<InvoiceResponse, String> {
        let response = self
            .http
            .post(format!("{}/api/invoices/{}/send", self.base_url, number))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Delete an invoice
    pub async fn delete_invoice(&self, number: &str) -> Result<(), String> {
        let response = self
            .http
            .delete(format!("{}/api/invoices/{}", self.base_url, number))
            .send()
            .await
            .map_err(network_error)?;
        expect_success(response).await
    }

    /// List clients, optionally with search text and a filter slice
    pub async fn get_clients(
        &self,
        q: Option<&str>,
        filter: &str,
    ) -> Result<ClientListResponse, String> {
        let mut url = format!("{}/api/clients?filter={}", self.base_url, filter);
        if let Some(q) = q {
            url = format!("{}&q={}", url, q);
        }

        let response = self.http.get(&url).send().await.map_err(network_error)?;
        parse_response(response).await
    }

    /// Create a new client
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<ClientResponse, String> {
        let response = self
            .http
            .post(format!("{}/api/clients", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Update a client
    pub async fn update_client(
        &self,
        client_id: &str,
        request: UpdateClientRequest,
    ) -> Result<ClientResponse, String> {
        let response = self
            .http
            .put(format!("{}/api/clients/{}", self.base_url, client_id))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Toggle a client's starred flag
    pub async fn toggle_client_star(&self, client_id: &str) -> Result<ClientResponse, String> {
        let response = self
            .http
            .put(format!("{}/api/clients/{}/star", self.base_url, client_id))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Get the client header stats
    pub async fn get_client_stats(&self) -> Result<ClientStats, String> {
        let response = self
            .http
            .get(format!("{}/api/clients/stats", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// List all appointments
    pub async fn get_appointments(&self) -> Result<AppointmentListResponse, String> {
        let response = self
            .http
            .get(format!("{}/api/appointments", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Create a new appointment
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, String> {
        let response = self
            .http
            .post(format!("{}/api/appointments", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Get calendar data for a specific month/year
    pub async fn get_calendar_month(&self, month: u32, year: i32) -> Result<CalendarMonth, String> {
        let url = format!(
            "{}/api/calendar/month?month={}&year={}",
            self.base_url, month, year
        );

        let response = self.http.get(&url).send().await.map_err(network_error)?;
        parse_response(response).await
    }

    /// Get the dashboard summary
    pub async fn get_dashboard(&self) -> Result<DashboardSummary, String> {
        let response = self
            .http
            .get(format!("{}/api/dashboard", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Get the workspace profile
    pub async fn get_profile(&self) -> Result<WorkspaceProfile, String> {
        let response = self
            .http
            .get(format!("{}/api/settings/profile", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Update the workspace profile
    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, String> {
        let response = self
            .http
            .put(format!("{}/api/settings/profile", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// List API key metadata
    pub async fn list_api_keys(&self) -> Result<ApiKeyListResponse, String> {
        let response = self
            .http
            .get(format!("{}/api/settings/api-keys", self.base_url))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Generate a new API key
    pub async fn generate_api_key(&self, label: &str) -> Result<GenerateApiKeyResponse, String> {
        let response = self
            .http
            .post(format!("{}/api/settings/api-keys", self.base_url))
            .json(&GenerateApiKeyRequest {
                label: label.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Revoke an API key
    pub async fn revoke_api_key(&self, key_id: &str) -> Result<RevokeApiKeyResponse, String> {
        let response = self
            .http
            .post(format!(
                "{}/api/settings/api-keys/{}/revoke",
                self.base_url, key_id
            ))
            .send()
            .await
            .map_err(network_error)?;
        parse_response(response).await
    }

    /// Subscribe to the change feed, invoking the callback for every signal
    /// until the stream ends or fails.
    pub async fn subscribe_changes<F>(&self, mut on_signal: F) -> Result<(), String>
    where
        F: FnMut(FeedSignal),
    {
        let response = self
            .http
            .get(format!("{}/api/events", self.base_url))
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(format!("Change feed refused: {}", response.status()));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| format!("Change feed interrupted: {}", e))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // SSE frames are separated by a blank line
            while let Some(split) = buffer.find("\n\n") {
                let block = buffer[..split].to_string();
                buffer.drain(..split + 2);
                if let Some(signal) = parse_event_block(&block) {
                    on_signal(signal);
                }
            }
        }

        Ok(())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn network_error(e: reqwest::Error) -> String {
    format!("Network error: {}", e)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_body(response).await)
    }
}

async fn expect_success(response: reqwest::Response) -> Result<(), String> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_body(response).await)
    }
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        text
    }
}

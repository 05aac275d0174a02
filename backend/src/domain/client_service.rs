use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::clients::{ClientFilter, ClientListQuery};
use crate::domain::{now_epoch_millis, now_rfc3339, publish_change, EventSender};
use crate::storage::DbConnection;
use shared::{
    ChangeOp, ChangeTable, Client, ClientListResponse, ClientResponse, ClientStats, ClientStatus,
    CreateClientRequest, UpdateClientRequest,
};

/// Service for managing the client directory
#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbConnection>,
    events: EventSender,
}

impl ClientService {
    /// Create a new ClientService
    pub fn new(db: Arc<DbConnection>, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Create a new client, active and unstarred by default
    pub async fn create_client(&self, request: CreateClientRequest) -> Result<ClientResponse> {
        info!("Creating client: name={}", request.name);

        self.validate_name(&request.name)?;
        self.validate_email(&request.email)?;

        let timestamp = now_rfc3339();
        let client = Client {
            id: Client::generate_id(now_epoch_millis()),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone,
            company: request.company,
            location: request.location,
            status: ClientStatus::Active,
            starred: false,
            notes: request.notes,
            total_spent: 0.0,
            invoice_count: 0,
            last_activity: None,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        self.db.store_client(&client).await?;

        publish_change(
            &self.events,
            ChangeTable::Clients,
            ChangeOp::Created,
            &client.id,
            serde_json::to_value(&client).ok(),
        );

        info!("Created client {} with ID {}", client.name, client.id);

        Ok(ClientResponse {
            client,
            success_message: "Client added".to_string(),
        })
    }

    /// List clients, optionally narrowed by search text and a status slice
    pub async fn list_clients(&self, query: ClientListQuery) -> Result<ClientListResponse> {
        let mut clients = self.db.list_clients().await?;

        if let Some(q) = query.q.as_deref() {
            let needle = q.to_lowercase();
            clients.retain(|client| {
                client.name.to_lowercase().contains(&needle)
                    || client.email.to_lowercase().contains(&needle)
                    || client.company.to_lowercase().contains(&needle)
            });
        }

        match query.filter {
            ClientFilter::All => {}
            ClientFilter::Active => clients.retain(|c| c.status == ClientStatus::Active),
            ClientFilter::Inactive => clients.retain(|c| c.status == ClientStatus::Inactive),
            ClientFilter::Starred => clients.retain(|c| c.starred),
        }

        Ok(ClientListResponse { clients })
    }

    /// Get a client by ID
    pub async fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        let client = self.db.get_client(client_id).await?;

        if client.is_none() {
            warn!("Client not found: {}", client_id);
        }

        Ok(client)
    }

    /// Update a client's contact fields and status
    pub async fn update_client(
        &self,
        client_id: &str,
        request: UpdateClientRequest,
    ) -> Result<ClientResponse> {
        info!("Updating client {}", client_id);

        let mut client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Client not found: {}", client_id))?;

        if let Some(name) = request.name {
            self.validate_name(&name)?;
            client.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            self.validate_email(&email)?;
            client.email = email.trim().to_string();
        }
        if let Some(phone) = request.phone {
            client.phone = phone;
        }
        if let Some(company) = request.company {
            client.company = company;
        }
        if let Some(location) = request.location {
            client.location = location;
        }
        if let Some(notes) = request.notes {
            client.notes = notes;
        }
        if let Some(status) = request.status {
            client.status = status;
        }

        client.updated_at = now_rfc3339();
        self.db.update_client(&client).await?;

        // Re-read so the response carries fresh spend aggregates
        let client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Client not found: {}", client_id))?;

        publish_change(
            &self.events,
            ChangeTable::Clients,
            ChangeOp::Updated,
            client_id,
            serde_json::to_value(&client).ok(),
        );

        Ok(ClientResponse {
            client,
            success_message: "Client updated".to_string(),
        })
    }

    /// Flip a client's starred flag, returning the updated record
    pub async fn toggle_star(&self, client_id: &str) -> Result<ClientResponse> {
        let client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Client not found: {}", client_id))?;

        let starred = !client.starred;
        self.db
            .set_client_starred(client_id, starred, &now_rfc3339())
            .await?;

        let client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Client not found: {}", client_id))?;

        publish_change(
            &self.events,
            ChangeTable::Clients,
            ChangeOp::Updated,
            client_id,
            serde_json::to_value(&client).ok(),
        );

        let success_message = if starred {
            "Client starred".to_string()
        } else {
            "Client unstarred".to_string()
        };

        Ok(ClientResponse {
            client,
            success_message,
        })
    }

    /// Delete a client
    pub async fn delete_client(&self, client_id: &str) -> Result<()> {
        info!("Deleting client {}", client_id);

        let client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Client not found: {}", client_id))?;

        self.db.delete_client(client_id).await?;

        publish_change(&self.events, ChangeTable::Clients, ChangeOp::Deleted, client_id, None);

        info!("Deleted client {} with ID {}", client.name, client.id);

        Ok(())
    }

    /// Header counts for the clients page
    pub async fn stats(&self) -> Result<ClientStats> {
        let clients = self.db.list_clients().await?;

        let active = clients.iter().filter(|c| c.status == ClientStatus::Active).count() as u32;
        let inactive = clients.iter().filter(|c| c.status == ClientStatus::Inactive).count() as u32;
        let total_revenue = clients.iter().map(|c| c.total_spent).sum();

        Ok(ClientStats {
            total: clients.len() as u32,
            active,
            inactive,
            total_revenue,
        })
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Client name cannot be empty"));
        }
        if name.len() > 100 {
            return Err(anyhow::anyhow!("Client name cannot exceed 100 characters"));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<()> {
        if !email.contains('@') {
            return Err(anyhow::anyhow!("Client email is not valid"));
        }
        Ok(())
    }
}

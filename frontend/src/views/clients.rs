//! Client directory view model: header stats and the filtered card grid.

use shared::{Client, ClientStatus, CurrencyCode};

use crate::state::{ClientFilter, ClientPageState};
use crate::views::format_currency;

/// One card in the directory grid
pub struct ClientCard {
    pub id: String,
    pub initials: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub location: String,
    pub revenue_label: String,
    pub invoice_count: u32,
    pub status: ClientStatus,
    pub starred: bool,
}

/// Header counts, formatted
pub struct ClientStatsView {
    pub total: u32,
    pub active: u32,
    pub inactive: u32,
    pub total_revenue: String,
}

/// Everything the clients page renders
pub struct ClientDirectoryView {
    pub stats: ClientStatsView,
    pub cards: Vec<ClientCard>,
    pub empty: bool,
}

/// Up to two uppercase initials from the leading words of a name
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(|ch| ch.to_uppercase())
        .collect()
}

/// The client detail modal
pub struct ClientDetailView {
    pub initials: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: ClientStatus,
    pub starred: bool,
    pub revenue_label: String,
    pub invoice_count: u32,
    pub last_activity: String,
    pub notes: String,
}

/// Build the detail modal for one client
pub fn build_client_detail(client: &Client, currency: CurrencyCode) -> ClientDetailView {
    ClientDetailView {
        initials: initials(&client.name),
        name: client.name.clone(),
        company: client.company.clone(),
        email: client.email.clone(),
        phone: client.phone.clone(),
        location: client.location.clone(),
        status: client.status,
        starred: client.starred,
        revenue_label: format_currency(client.total_spent, currency),
        invoice_count: client.invoice_count,
        last_activity: client
            .last_activity
            .clone()
            .unwrap_or_else(|| "No invoices yet".to_string()),
        notes: client.notes.clone(),
    }
}

/// Build the clients page view. Stats cover the whole cache; search and the
/// filter slice narrow only the cards.
pub fn build_client_directory(
    clients: &[Client],
    state: &ClientPageState,
    currency: CurrencyCode,
) -> ClientDirectoryView {
    let active = clients.iter().filter(|c| c.status == ClientStatus::Active).count() as u32;
    let inactive = clients.iter().filter(|c| c.status == ClientStatus::Inactive).count() as u32;
    let total_revenue: f64 = clients.iter().map(|c| c.total_spent).sum();

    let needle = state.search_query.to_lowercase();
    let cards: Vec<ClientCard> = clients
        .iter()
        .filter(|client| {
            needle.is_empty()
                || client.name.to_lowercase().contains(&needle)
                || client.email.to_lowercase().contains(&needle)
                || client.company.to_lowercase().contains(&needle)
        })
        .filter(|client| match state.filter {
            ClientFilter::All => true,
            ClientFilter::Active => client.status == ClientStatus::Active,
            ClientFilter::Inactive => client.status == ClientStatus::Inactive,
            ClientFilter::Starred => client.starred,
        })
        .map(|client| ClientCard {
            id: client.id.clone(),
            initials: initials(&client.name),
            name: client.name.clone(),
            company: client.company.clone(),
            email: client.email.clone(),
            location: client.location.clone(),
            revenue_label: format_currency(client.total_spent, currency),
            invoice_count: client.invoice_count,
            status: client.status,
            starred: client.starred,
        })
        .collect();

    ClientDirectoryView {
        stats: ClientStatsView {
            total: clients.len() as u32,
            active,
            inactive,
            total_revenue: format_currency(total_revenue, currency),
        },
        empty: cards.is_empty(),
        cards,
    }
}

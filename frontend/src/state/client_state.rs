//! # Clients Page State

use shared::CreateClientRequest;

/// Which slice of the directory is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientFilter {
    #[default]
    All,
    Active,
    Inactive,
    Starred,
}

impl ClientFilter {
    /// Query-string value for the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientFilter::All => "all",
            ClientFilter::Active => "active",
            ClientFilter::Inactive => "inactive",
            ClientFilter::Starred => "starred",
        }
    }
}

/// State for the clients page
pub struct ClientPageState {
    pub search_query: String,
    pub filter: ClientFilter,
    pub show_create_modal: bool,
    /// ID of the client open in the detail view
    pub view_client: Option<String>,
    pub form: ClientFormState,
}

impl ClientPageState {
    pub fn new() -> Self {
        Self {
            search_query: String::new(),
            filter: ClientFilter::All,
            show_create_modal: false,
            view_client: None,
            form: ClientFormState::new(),
        }
    }

    pub fn open_create_modal(&mut self) {
        self.form = ClientFormState::new();
        self.show_create_modal = true;
    }

    pub fn close_create_modal(&mut self) {
        self.show_create_modal = false;
    }
}

impl Default for ClientPageState {
    fn default() -> Self {
        Self::new()
    }
}

/// The add-client form
pub struct ClientFormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub location: String,
    pub notes: String,
}

impl ClientFormState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            location: String::new(),
            notes: String::new(),
        }
    }

    pub fn to_request(&self) -> CreateClientRequest {
        CreateClientRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            notes: self.notes.clone(),
        }
    }
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_values() {
        assert_eq!(ClientFilter::All.as_str(), "all");
        assert_eq!(ClientFilter::Starred.as_str(), "starred");
        assert_eq!(ClientFilter::default(), ClientFilter::All);
    }

    #[test]
    fn test_form_to_request_trims() {
        let mut form = ClientFormState::new();
        form.name = " Acme Corp ".to_string();
        form.email = "billing@acme.com".to_string();

        let request = form.to_request();
        assert_eq!(request.name, "Acme Corp");
        assert_eq!(request.email, "billing@acme.com");
    }

    #[test]
    fn test_open_create_modal_resets_form() {
        let mut state = ClientPageState::new();
        state.form.name = "Leftover".to_string();

        state.open_create_modal();
        assert!(state.show_create_modal);
        assert!(state.form.name.is_empty());
    }
}

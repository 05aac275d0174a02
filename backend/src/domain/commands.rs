//! Domain-level query types
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps query-string parameters
//! onto these types before calling into the services.

pub mod invoices {
    use shared::InvoiceStatus;

    /// Query parameters for listing invoices.
    #[derive(Debug, Clone, Default)]
    pub struct InvoiceListQuery {
        /// Case-insensitive match against invoice number or client name
        pub q: Option<String>,
        /// Restrict to one status; `None` means all
        pub status: Option<InvoiceStatus>,
    }
}

pub mod clients {
    /// Which slice of the client directory to return.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ClientFilter {
        #[default]
        All,
        Active,
        Inactive,
        Starred,
    }

    impl ClientFilter {
        /// Parse the query-string value; unknown values fall back to All
        pub fn parse(value: &str) -> ClientFilter {
            match value {
                "active" => ClientFilter::Active,
                "inactive" => ClientFilter::Inactive,
                "starred" => ClientFilter::Starred,
                _ => ClientFilter::All,
            }
        }
    }

    /// Query parameters for listing clients.
    #[derive(Debug, Clone, Default)]
    pub struct ClientListQuery {
        /// Case-insensitive match against name, email or company
        pub q: Option<String>,
        pub filter: ClientFilter,
    }
}

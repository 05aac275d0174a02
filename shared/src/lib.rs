use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an invoice.
///
/// Transitions are deliberately unconstrained: any status may be set from any
/// other via explicit user action, and external writers may push any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 6] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    /// Wire value, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for badges and table cells
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status: {0}")]
pub struct InvoiceStatusParseError(pub String);

impl FromStr for InvoiceStatus {
    type Err = InvoiceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(InvoiceStatusParseError(other.to_string())),
        }
    }
}

/// Status of a client record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client status: {0}")]
pub struct ClientStatusParseError(pub String);

impl FromStr for ClientStatus {
    type Err = ClientStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            other => Err(ClientStatusParseError(other.to_string())),
        }
    }
}

/// Currency codes supported by the workspace settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Try,
    Sek,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Try => "TRY",
            CurrencyCode::Sek => "SEK",
        }
    }

    /// Display symbol used when formatting amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Try => "₺",
            CurrencyCode::Sek => "kr",
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::Usd
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency code: {0}")]
pub struct CurrencyParseError(pub String);

impl FromStr for CurrencyCode {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            "GBP" => Ok(CurrencyCode::Gbp),
            "TRY" => Ok(CurrencyCode::Try),
            "SEK" => Ok(CurrencyCode::Sek),
            other => Err(CurrencyParseError(other.to_string())),
        }
    }
}

/// One billable entry on an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Positive integer quantity
    pub quantity: u32,
    /// Non-negative unit rate
    pub rate: f64,
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.rate
    }
}

/// Sum of quantity × rate over an ordered list of line items.
/// An empty list yields 0.
pub fn line_item_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::total).sum()
}

/// An invoice as served to clients.
///
/// `number` doubles as the record identifier (`INV-NNN`, server-allocated).
/// `amount` is computed from the line items at creation time and always
/// equals their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub client: String,
    pub email: String,
    /// Issue date (YYYY-MM-DD)
    pub date: String,
    /// Due date (YYYY-MM-DD)
    pub due_date: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub currency: CurrencyCode,
    pub items: Vec<LineItem>,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client: String,
    pub email: String,
    /// Due date (YYYY-MM-DD)
    pub due_date: String,
    /// Falls back to the workspace currency when omitted
    pub currency: Option<CurrencyCode>,
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

/// Header sums for the invoices page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total_invoiced: f64,
    pub paid: f64,
    /// Pending + sent amounts
    pub pending: f64,
    pub overdue: f64,
}

/// A client (CRM) record.
///
/// `total_spent`, `invoice_count` and `last_activity` are derived from the
/// invoice table on read; they are never written through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// ID in format: "client::<epoch_millis>"
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub location: String,
    pub status: ClientStatus,
    pub starred: bool,
    pub notes: String,
    /// Sum of paid invoice amounts for this client
    pub total_spent: f64,
    pub invoice_count: u32,
    /// Issue date of the most recent invoice, if any
    pub last_activity: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Client {
    /// Generate a client ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("client::{}", epoch_millis)
    }

    /// Parse a client ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, RecordIdError> {
        parse_record_id(id, "client")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub location: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ClientStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub client: Client,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<Client>,
}

/// Header counts for the clients page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientStats {
    pub total: u32,
    pub active: u32,
    pub inactive: u32,
    pub total_revenue: f64,
}

/// A calendar appointment.
///
/// Appointments are created through the day-detail form and never edited or
/// deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// ID in format: "appointment::<epoch_millis>"
    pub id: String,
    /// Date key (YYYY-MM-DD)
    pub date: String,
    /// Time of day (HH:MM)
    pub time: String,
    pub title: String,
    pub client: String,
    pub notes: String,
    pub created_at: String,
}

impl Appointment {
    /// Generate an appointment ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("appointment::{}", epoch_millis)
    }

    /// Parse an appointment ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, RecordIdError> {
        parse_record_id(id, "appointment")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub date: String,
    pub time: String,
    pub title: String,
    pub client: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
}

/// A single cell of the 42-cell month grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDayCell {
    /// Date key (YYYY-MM-DD), zero-padded for lookup and sorting
    pub date_key: String,
    /// Day-of-month number of this cell
    pub day: u32,
    /// Whether the cell belongs to the displayed month
    pub in_month: bool,
    /// Appointments on this date, in input order
    pub appointments: Vec<Appointment>,
}

/// A month view: always exactly 42 cells, Sunday-first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub days: Vec<CalendarDayCell>,
    /// Weekday of the 1st (0 = Sunday .. 6 = Saturday)
    pub first_day_of_week: u32,
}

/// Month/year the calendar is currently focused on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarFocusDate {
    pub month: u32,
    pub year: i32,
}

impl Default for CalendarFocusDate {
    fn default() -> Self {
        use chrono::Datelike;
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }
}

/// Workspace settings (single row): session profile, company details and
/// notification preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceProfile {
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
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: WorkspaceProfile,
    pub success_message: String,
}

/// API key metadata as listed in settings. The full key is only ever
/// returned once, in `GenerateApiKeyResponse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub id: String,
    pub label: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateApiKeyRequest {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateApiKeyResponse {
    /// The full key. Shown once, never retrievable again.
    pub api_key: String,
    pub info: ApiKeyInfo,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyListResponse {
    pub keys: Vec<ApiKeyInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeApiKeyResponse {
    pub success_message: String,
}

/// Revenue for one month slot of the dashboard chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    /// Short label, e.g. "Jan"
    pub label: String,
    pub revenue: f64,
}

/// Aggregated read model for the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of paid invoice amounts
    pub total_revenue: f64,
    /// Sum of pending + sent invoice amounts
    pub outstanding: f64,
    /// Sum of overdue invoice amounts
    pub overdue: f64,
    pub invoices_paid: u32,
    pub invoices_outstanding: u32,
    pub upcoming_appointments: u32,
    /// Twelve slots for the focus year
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub recent_invoices: Vec<Invoice>,
}

/// Table a change notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTable {
    Invoices,
    Clients,
    Appointments,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Created,
    Updated,
    Deleted,
}

/// A change notification pushed to subscribers after every write.
///
/// Carries the full record for created/updated rows so subscribers can apply
/// the change incrementally by id instead of reloading the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub op: ChangeOp,
    /// Record identifier (invoice number, client id, appointment id)
    pub id: String,
    pub record: Option<serde_json::Value>,
}

/// Format a date key, zero-padding month and day to two digits so keys sort
/// and compare as strings.
pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Parse a YYYY-MM-DD date key into (year, month, day)
pub fn parse_date_key(key: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = key.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let year = parts[0].parse::<i32>().ok()?;
    let month = parts[1].parse::<u32>().ok()?;
    let day = parts[2].parse::<u32>().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdError {
    #[error("invalid record id format")]
    InvalidFormat,
    #[error("invalid timestamp in record id")]
    InvalidTimestamp,
}

fn parse_record_id(id: &str, prefix: &str) -> Result<u64, RecordIdError> {
    let parts: Vec<&str> = id.split("::").collect();
    if parts.len() != 2 || parts[0] != prefix {
        return Err(RecordIdError::InvalidFormat);
    }
    parts[1]
        .parse::<u64>()
        .map_err(|_| RecordIdError::InvalidTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_total() {
        let item = LineItem {
            description: "Consulting".to_string(),
            quantity: 14,
            rate: 300.0,
        };
        assert_eq!(item.total(), 4200.0);
    }

    #[test]
    fn test_line_item_total_sum() {
        let items = vec![
            LineItem {
                description: "UI/UX Audit".to_string(),
                quantity: 2,
                rate: 300.0,
            },
            LineItem {
                description: "Prototype Build".to_string(),
                quantity: 1,
                rate: 150.0,
            },
        ];
        assert_eq!(line_item_total(&items), 750.0);
    }

    #[test]
    fn test_line_item_total_empty() {
        assert_eq!(line_item_total(&[]), 0.0);
    }

    #[test]
    fn test_invoice_status_round_trip() {
        for status in InvoiceStatus::ALL {
            assert_eq!(status.as_str().parse::<InvoiceStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_invoice_status_serde_uses_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Overdue).unwrap();
        assert_eq!(json, "\"overdue\"");
        let status: InvoiceStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_currency_round_trip() {
        for code in ["USD", "EUR", "GBP", "TRY", "SEK"] {
            assert_eq!(code.parse::<CurrencyCode>().unwrap().as_str(), code);
        }
        assert!("BTC".parse::<CurrencyCode>().is_err());
        assert_eq!(CurrencyCode::Gbp.symbol(), "£");
    }

    #[test]
    fn test_generate_client_id() {
        assert_eq!(Client::generate_id(1702516122000), "client::1702516122000");
    }

    #[test]
    fn test_parse_client_id() {
        assert_eq!(Client::parse_id("client::1702516122000").unwrap(), 1702516122000);

        assert!(Client::parse_id("client").is_err());
        assert!(Client::parse_id("appointment::123").is_err());
        assert!(Client::parse_id("client::not_a_number").is_err());
    }

    #[test]
    fn test_parse_appointment_id() {
        assert_eq!(
            Appointment::parse_id("appointment::1702516125000").unwrap(),
            1702516125000
        );
        assert!(Appointment::parse_id("client::1702516125000").is_err());
    }

    #[test]
    fn test_date_key_zero_pads() {
        assert_eq!(date_key(2026, 2, 1), "2026-02-01");
        assert_eq!(date_key(2026, 12, 31), "2026-12-31");
        // Padded keys sort as strings
        assert!(date_key(2026, 2, 9) < date_key(2026, 2, 10));
        assert!(date_key(2026, 9, 30) < date_key(2026, 10, 1));
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(parse_date_key("2026-02-10"), Some((2026, 2, 10)));
        assert_eq!(parse_date_key("2026-2-10"), Some((2026, 2, 10)));
        assert_eq!(parse_date_key("2026-13-10"), None);
        assert_eq!(parse_date_key("2026-02"), None);
        assert_eq!(parse_date_key("not-a-date"), None);
    }

    #[test]
    fn test_change_event_serde() {
        let event = ChangeEvent {
            table: ChangeTable::Invoices,
            op: ChangeOp::Created,
            id: "INV-001".to_string(),
            record: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"table\":\"invoices\""));
        assert!(json.contains("\"op\":\"created\""));
        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

//! Incremental application of change notifications.
//!
//! Instead of reloading a whole table when the backend signals a change, the
//! feed carries the affected record and the client patches its in-memory
//! list by id. Only a `resync` signal (a lagged subscription) forces a full
//! reload.

use serde::de::DeserializeOwned;
use shared::{Appointment, ChangeEvent, ChangeOp, Client, Invoice};
use tracing::warn;

/// One parsed frame of the change feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSignal {
    /// Apply this event incrementally
    Change(ChangeEvent),
    /// The subscription fell behind; reload lists wholesale once
    Resync,
}

/// Parse one server-sent-event block (the lines between blank-line
/// separators) into a feed signal. Comment lines and unknown event names
/// yield `None`.
pub fn parse_event_block(block: &str) -> Option<FeedSignal> {
    let mut event_name = "message";
    let mut data = String::new();

    for line in block.lines() {
        if line.starts_with(':') {
            continue; // keep-alive comment
        }
        if let Some(rest) = line.strip_prefix("event:") {
            event_name = rest.trim();
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    match event_name {
        "resync" => Some(FeedSignal::Resync),
        // Keep-alive frames arrive as empty default-typed events
        "message" if data.is_empty() => None,
        "change" | "message" => match serde_json::from_str(&data) {
            Ok(event) => Some(FeedSignal::Change(event)),
            Err(e) => {
                warn!("Discarding malformed change event: {}", e);
                None
            }
        },
        _ => None,
    }
}

/// Records that can be located in a list by their identifier
pub trait Identified {
    fn record_id(&self) -> &str;
}

impl Identified for Invoice {
    fn record_id(&self) -> &str {
        &self.number
    }
}

impl Identified for Client {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for Appointment {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Apply one change event to an in-memory list, keyed by record id.
///
/// Created and updated records upsert: an existing entry is replaced in
/// place, a new one goes to the front (lists are newest-first). Deleted ids
/// are removed. Returns whether the list changed.
pub fn apply_change<T>(list: &mut Vec<T>, event: &ChangeEvent) -> bool
where
    T: Identified + DeserializeOwned,
{
    match event.op {
        ChangeOp::Created | ChangeOp::Updated => {
            let Some(value) = event.record.clone() else {
                warn!("Change event for {} carried no record", event.id);
                return false;
            };
            let record: T = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Change event for {} had a malformed record: {}", event.id, e);
                    return false;
                }
            };

            match list.iter().position(|entry| entry.record_id() == event.id) {
                Some(index) => list[index] = record,
                None => list.insert(0, record),
            }
            true
        }
        ChangeOp::Deleted => {
            let before = list.len();
            list.retain(|entry| entry.record_id() != event.id);
            list.len() != before
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ChangeTable, CurrencyCode, InvoiceStatus, LineItem};

    fn invoice(number: &str, amount: f64, status: InvoiceStatus) -> Invoice {
        Invoice {
            number: number.to_string(),
            client: "Acme Corp".to_string(),
            email: "billing@acme.com".to_string(),
            date: "2026-02-10".to_string(),
            due_date: "2026-03-10".to_string(),
            amount,
            status,
            currency: CurrencyCode::Usd,
            items: vec![LineItem {
                description: "Work".to_string(),
                quantity: 1,
                rate: amount,
            }],
            created_at: "2026-02-10T09:00:00+00:00".to_string(),
            updated_at: "2026-02-10T09:00:00+00:00".to_string(),
        }
    }

    fn event(op: ChangeOp, id: &str, record: Option<&Invoice>) -> ChangeEvent {
        ChangeEvent {
            table: ChangeTable::Invoices,
            op,
            id: id.to_string(),
            record: record.map(|r| serde_json::to_value(r).unwrap()),
        }
    }

    #[test]
    fn test_created_record_is_inserted_at_front() {
        let mut list = vec![invoice("INV-001", 100.0, InvoiceStatus::Draft)];
        let new = invoice("INV-002", 200.0, InvoiceStatus::Draft);

        let changed = apply_change(&mut list, &event(ChangeOp::Created, "INV-002", Some(&new)));

        assert!(changed);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].number, "INV-002");
    }

    #[test]
    fn test_updated_record_is_replaced_in_place() {
        let mut list = vec![
            invoice("INV-002", 200.0, InvoiceStatus::Draft),
            invoice("INV-001", 100.0, InvoiceStatus::Draft),
        ];
        let updated = invoice("INV-001", 100.0, InvoiceStatus::Paid);

        let changed = apply_change(&mut list, &event(ChangeOp::Updated, "INV-001", Some(&updated)));

        assert!(changed);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].status, InvoiceStatus::Paid);
        // Position preserved
        assert_eq!(list[1].number, "INV-001");
    }

    #[test]
    fn test_update_for_unseen_record_upserts() {
        let mut list: Vec<Invoice> = Vec::new();
        let record = invoice("INV-005", 500.0, InvoiceStatus::Sent);

        let changed = apply_change(&mut list, &event(ChangeOp::Updated, "INV-005", Some(&record)));

        assert!(changed);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_deleted_record_is_removed() {
        let mut list = vec![
            invoice("INV-002", 200.0, InvoiceStatus::Draft),
            invoice("INV-001", 100.0, InvoiceStatus::Draft),
        ];

        let changed = apply_change(&mut list, &event(ChangeOp::Deleted, "INV-001", None));
        assert!(changed);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].number, "INV-002");

        // Deleting an unknown id is a no-op
        let changed = apply_change(&mut list, &event(ChangeOp::Deleted, "INV-404", None));
        assert!(!changed);
    }

    #[test]
    fn test_change_without_record_is_ignored() {
        let mut list = vec![invoice("INV-001", 100.0, InvoiceStatus::Draft)];

        let changed = apply_change(&mut list, &event(ChangeOp::Updated, "INV-001", None));
        assert!(!changed);
        assert_eq!(list[0].status, InvoiceStatus::Draft);
    }

    #[test]
    fn test_parse_event_block_change() {
        let record = invoice("INV-001", 100.0, InvoiceStatus::Draft);
        let change = event(ChangeOp::Created, "INV-001", Some(&record));
        let block = format!("event: change\ndata: {}", serde_json::to_string(&change).unwrap());

        let signal = parse_event_block(&block).expect("Expected a signal");
        assert_eq!(signal, FeedSignal::Change(change));
    }

    #[test]
    fn test_parse_event_block_resync_and_noise() {
        assert_eq!(
            parse_event_block("event: resync\ndata: reload"),
            Some(FeedSignal::Resync)
        );

        // Keep-alive comments parse to nothing
        assert_eq!(parse_event_block(":"), None);

        // Unknown event names are dropped
        assert_eq!(parse_event_block("event: mystery\ndata: {}"), None);

        // Garbage data is dropped, not a panic
        assert_eq!(parse_event_block("event: change\ndata: not-json"), None);
    }
}

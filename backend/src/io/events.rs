//! Change-notification feed.
//!
//! Every service write publishes a [`shared::ChangeEvent`] on a broadcast
//! channel; this module fans the channel out to HTTP clients as server-sent
//! events. Events carry the full record, so subscribers apply them
//! incrementally by id. A receiver that falls behind gets a `resync` event
//! and is expected to reload its lists once.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{error, warn};

use crate::AppState;

/// GET /api/events - subscribe to the change feed
pub async fn change_feed(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).map(|result| {
        let event = match result {
            Ok(change) => match Event::default().event("change").json_data(&change) {
                Ok(event) => event,
                Err(e) => {
                    error!("Failed to serialize change event: {}", e);
                    Event::default().event("resync").data("reload")
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!("Change feed subscriber lagged, {} events skipped", skipped);
                Event::default().event("resync").data("reload")
            }
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

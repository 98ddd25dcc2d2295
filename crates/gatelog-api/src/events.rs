//! Handler for `GET /events` — the live log as a server-sent-event stream.
//!
//! Each store snapshot becomes one `snapshot` event carrying the full record
//! set (replace-whole-set contract, same as the in-process subscription);
//! subscription faults surface as a `fault` event. The subscription is
//! severed when the client disconnects and the stream is dropped.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use gatelog_core::store::{LogEvent, LogSubscription, VisitorStore};
use serde_json::json;

use crate::error::ApiError;

fn to_sse_event(event: LogEvent) -> Option<Event> {
  match event {
    LogEvent::Snapshot(batch) => {
      Event::default().event("snapshot").json_data(&batch).ok()
    }
    LogEvent::Fault(message) => Event::default()
      .event("fault")
      .json_data(json!({ "error": message }))
      .ok(),
  }
}

/// `GET /events`
pub async fn stream<S>(
  State(store): State<Arc<S>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError>
where
  S: VisitorStore,
  S::Subscription: 'static,
{
  let subscription = store
    .subscribe()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let stream = futures::stream::unfold(subscription, |mut sub| async move {
    let event = sub.next_event().await?;
    Some((to_sse_event(event), sub))
  })
  .filter_map(|event| async move { event.map(Ok) });

  Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

//! The log session — the screen-level owner of the live visitor log.
//!
//! A session holds the in-memory record set exclusively. All mutation flows
//! through the subscribe-then-replace pattern: snapshots from the store
//! replace the whole set, and status writes never touch local state — the
//! next snapshot is the sole source of truth, so a rejected write cannot
//! leave the session diverged.

use crate::{
  Error, Result,
  filter::{self, FilterConfig},
  record::{VisitStatus, VisitorRecord},
  store::{LogEvent, LogSubscription, VisitorStore},
};

// ─── Check-out intent ────────────────────────────────────────────────────────

/// Proof that the first step of the two-step check-out gesture happened.
///
/// Obtained from [`LogSession::request_check_out`] and consumed by
/// [`LogSession::confirm_check_out`]; there is no other way to issue the
/// check-out write, which keeps accidental single-tap checkouts impossible.
#[derive(Debug)]
pub struct CheckOutIntent {
  id:   String,
  name: String,
}

impl CheckOutIntent {
  pub fn record_id(&self) -> &str { &self.id }

  /// The visitor's display name, for the confirmation prompt.
  pub fn visitor_name(&self) -> &str { &self.name }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A live view over the visitor log, generic over the store backend.
///
/// Single consumer, cooperatively scheduled: the caller drives delivery by
/// awaiting [`pump`](Self::pump). Tearing the session down (via
/// [`close`](Self::close) or drop) severs the subscription before any
/// further event can be applied.
pub struct LogSession<S: VisitorStore> {
  store:        S,
  subscription: Option<S::Subscription>,
  records:      Vec<VisitorRecord>,
  filter:       FilterConfig,
  notice:       Option<String>,
}

impl<S: VisitorStore> LogSession<S> {
  /// Subscribe to the store and return a session with an empty record set.
  /// The initial snapshot arrives on the first [`pump`](Self::pump).
  pub async fn open(store: S) -> Result<Self, S::Error> {
    let subscription = store.subscribe().await?;
    Ok(Self {
      store,
      subscription: Some(subscription),
      records: Vec::new(),
      filter: FilterConfig::default(),
      notice: None,
    })
  }

  /// Await and apply the next subscription event.
  ///
  /// Snapshots replace the whole record set. Faults become a user-visible
  /// notice while the previously loaded data stays visible — stale but
  /// present beats blank. Returns `false` once the subscription is closed.
  pub async fn pump(&mut self) -> bool {
    let Some(sub) = self.subscription.as_mut() else {
      return false;
    };
    match sub.next_event().await {
      Some(LogEvent::Snapshot(batch)) => {
        self.records = batch;
        true
      }
      Some(LogEvent::Fault(message)) => {
        self.notice = Some(message);
        true
      }
      None => {
        self.close();
        false
      }
    }
  }

  /// The complete in-memory record set, unfiltered.
  pub fn records(&self) -> &[VisitorRecord] { &self.records }

  /// Derive the visible list under the current filter configuration.
  pub fn visible(&self) -> Vec<VisitorRecord> {
    filter::apply(&self.records, &self.filter)
  }

  pub fn filter(&self) -> &FilterConfig { &self.filter }

  pub fn filter_mut(&mut self) -> &mut FilterConfig { &mut self.filter }

  pub fn set_search(&mut self, query: impl Into<String>) {
    let query = query.into();
    self.filter.search =
      if query.trim().is_empty() { None } else { Some(query) };
  }

  /// Take the pending non-fatal notice, if any. Dismissible: taking clears.
  pub fn take_notice(&mut self) -> Option<String> { self.notice.take() }

  // ── Check-out ─────────────────────────────────────────────────────────

  /// Step one of the check-out gesture: validate the target and hand back
  /// an intent token for the caller to confirm against the user.
  pub fn request_check_out(&self, id: &str) -> Result<CheckOutIntent> {
    let record = self
      .records
      .iter()
      .find(|r| r.id == id)
      .ok_or_else(|| Error::RecordNotFound(id.to_owned()))?;
    if record.status == VisitStatus::Out {
      return Err(Error::AlreadyCheckedOut(id.to_owned()));
    }
    Ok(CheckOutIntent { id: record.id.clone(), name: record.name.clone() })
  }

  /// Step two: issue the single atomic store write.
  ///
  /// Deliberately does not mutate the in-memory set — the subscription's
  /// next snapshot reflects the change. On failure the prior status stands
  /// and the caller may retry by going through the gesture again.
  pub async fn confirm_check_out(
    &self,
    intent: CheckOutIntent,
  ) -> Result<()> {
    self
      .store
      .check_out(&intent.id)
      .await
      .map_err(Error::store)?;
    Ok(())
  }

  // ── Teardown ──────────────────────────────────────────────────────────

  /// Synchronously sever the subscription. Idempotent. Records already
  /// loaded remain readable; no further event will be applied.
  pub fn close(&mut self) {
    if let Some(mut sub) = self.subscription.take() {
      sub.unsubscribe();
    }
  }

  pub fn is_closed(&self) -> bool { self.subscription.is_none() }
}

impl<S: VisitorStore> Drop for LogSession<S> {
  fn drop(&mut self) { self.close(); }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

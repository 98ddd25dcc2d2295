//! [`SqliteStore`] — the SQLite implementation of [`VisitorStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::broadcast;
use uuid::Uuid;

use gatelog_core::{
  document::{AdditionalDetails, RawDocument, normalize},
  record::{VisitStatus, VisitorRecord},
  store::{LogEvent, LogSubscription, NewVisitor, VisitorStore},
};

use crate::{
  Error, Result,
  encode::{decode_document, encode_document, encode_dt},
  schema::SCHEMA,
};

/// Snapshot batches buffered per subscriber before a slow consumer lags.
/// Small on purpose — each batch supersedes the previous one anyway.
const SNAPSHOT_BUFFER: usize = 32;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A visitor record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted and all
/// clones share one snapshot broadcast channel.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  updates: broadcast::Sender<Vec<VisitorRecord>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let (updates, _) = broadcast::channel(SNAPSHOT_BUFFER);
    let store = Self { conn, updates };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Query the full ordered collection and push it to every subscriber.
  /// Called after each successful mutation.
  async fn publish_snapshot(&self) -> Result<()> {
    let snapshot = self.list().await?;
    // No subscribers is not an error.
    let _ = self.updates.send(snapshot);
    Ok(())
  }

  /// Read-modify-write one document inside a transaction. `mutate` returns
  /// the document's replacement body or a domain error; either way nothing
  /// intermediate is ever observable.
  async fn update_document<F>(&self, id: &str, mutate: F) -> Result<VisitorRecord>
  where
    F: FnOnce(&str, RawDocument) -> Result<RawDocument> + Send + 'static,
  {
    let id_owned = id.to_owned();
    let outcome: Result<(String, String)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let body: Option<String> = tx
          .query_row(
            "SELECT body_json FROM visitors WHERE doc_id = ?1",
            rusqlite::params![id_owned],
            |r| r.get(0),
          )
          .optional()?;

        let Some(body) = body else {
          return Ok(Err(Error::RecordNotFound(id_owned)));
        };

        let doc = match decode_document(&body) {
          Ok(doc) => doc,
          Err(e) => return Ok(Err(e)),
        };

        let updated = match mutate(&id_owned, doc) {
          Ok(doc) => doc,
          Err(e) => return Ok(Err(e)),
        };

        let new_body = match encode_document(&updated) {
          Ok(body) => body,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(
          "UPDATE visitors SET body_json = ?2 WHERE doc_id = ?1",
          rusqlite::params![id_owned, new_body],
        )?;
        tx.commit()?;

        Ok(Ok((id_owned, new_body)))
      })
      .await?;

    let (id, body) = outcome?;
    let record = normalize(&id, &decode_document(&body)?);
    self.publish_snapshot().await?;
    Ok(record)
  }
}

// ─── Trait implementation ────────────────────────────────────────────────────

impl VisitorStore for SqliteStore {
  type Error = Error;
  type Subscription = SqliteSubscription;

  async fn register(&self, input: NewVisitor) -> Result<VisitorRecord> {
    let id = Uuid::new_v4().to_string();
    let stamp = encode_dt(Utc::now());

    let doc = RawDocument {
      name: Some(input.name),
      contact_number: Some(input.contact_number),
      purpose_of_visit: Some(input.purpose),
      status: Some(VisitStatus::Pending.as_str().to_owned()),
      registration_date: Some(stamp.clone()),
      kind: Some(input.kind.as_str().to_owned()),
      additional_details: Some(AdditionalDetails {
        whom_to_meet: input.whom_to_meet,
        department: input.department,
        visitor_photo_url: input.photo_url,
        document_url: input.document_url,
      }),
      ..Default::default()
    };

    let body = encode_document(&doc)?;
    let id_param = id.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO visitors (doc_id, body_json, registered_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_param, body, stamp],
        )?;
        Ok(())
      })
      .await?;

    self.publish_snapshot().await?;
    Ok(normalize(&id, &doc))
  }

  async fn get(&self, id: &str) -> Result<Option<VisitorRecord>> {
    let id_owned = id.to_owned();
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        let body = conn
          .query_row(
            "SELECT body_json FROM visitors WHERE doc_id = ?1",
            rusqlite::params![id_owned],
            |r| r.get(0),
          )
          .optional()?;
        Ok(body)
      })
      .await?;

    match body {
      Some(body) => Ok(Some(normalize(id, &decode_document(&body)?))),
      None => Ok(None),
    }
  }

  async fn list(&self) -> Result<Vec<VisitorRecord>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT doc_id, body_json FROM visitors
           ORDER BY registered_at DESC, doc_id",
        )?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .iter()
      .map(|(id, body)| Ok(normalize(id, &decode_document(body)?)))
      .collect()
  }

  async fn check_in(&self, id: &str) -> Result<VisitorRecord> {
    let stamp = encode_dt(Utc::now());
    self
      .update_document(id, move |_, mut doc| {
        let from = doc
          .status
          .as_deref()
          .map(VisitStatus::parse_lenient)
          .unwrap_or(VisitStatus::Pending);
        if !from.can_transition_to(VisitStatus::In) {
          return Err(Error::IllegalTransition { from, to: VisitStatus::In });
        }
        doc.status = Some(VisitStatus::In.as_str().to_owned());
        doc.check_in_time = Some(stamp.clone());
        doc.last_updated = Some(stamp);
        Ok(doc)
      })
      .await
  }

  async fn check_out(&self, id: &str) -> Result<VisitorRecord> {
    let stamp = encode_dt(Utc::now());
    self
      .update_document(id, move |id, mut doc| {
        let from = doc
          .status
          .as_deref()
          .map(VisitStatus::parse_lenient)
          .unwrap_or(VisitStatus::Pending);
        if from == VisitStatus::Out {
          return Err(Error::AlreadyCheckedOut(id.to_owned()));
        }
        doc.status = Some(VisitStatus::Out.as_str().to_owned());
        doc.check_out_time = Some(stamp.clone());
        doc.last_updated = Some(stamp);
        Ok(doc)
      })
      .await
  }

  async fn remove(&self, id: &str) -> Result<()> {
    let id_owned = id.to_owned();
    let removed: usize = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM visitors WHERE doc_id = ?1",
          rusqlite::params![id_owned],
        )?;
        Ok(n)
      })
      .await?;

    if removed == 0 {
      return Err(Error::RecordNotFound(id.to_owned()));
    }
    self.publish_snapshot().await?;
    Ok(())
  }

  async fn subscribe(&self) -> Result<SqliteSubscription> {
    // Tap the channel before reading the snapshot so a concurrent write is
    // either in the snapshot or in the channel — never lost.
    let rx = self.updates.subscribe();
    let initial = self.list().await?;
    Ok(SqliteSubscription {
      pending: Some(initial),
      rx:      Some(rx),
      faulted: false,
    })
  }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// A live subscription over a [`SqliteStore`].
///
/// Yields the collection snapshot taken at subscribe time first, then a full
/// replacement snapshot after every store mutation.
pub struct SqliteSubscription {
  pending: Option<Vec<VisitorRecord>>,
  rx:      Option<broadcast::Receiver<Vec<VisitorRecord>>>,
  faulted: bool,
}

impl LogSubscription for SqliteSubscription {
  async fn next_event(&mut self) -> Option<LogEvent> {
    if let Some(batch) = self.pending.take() {
      return Some(LogEvent::Snapshot(batch));
    }
    let rx = self.rx.as_mut()?;
    loop {
      match rx.recv().await {
        Ok(batch) => return Some(LogEvent::Snapshot(batch)),
        Err(broadcast::error::RecvError::Lagged(missed)) => {
          // The next snapshot supersedes whatever was missed; surface the
          // fault once, then keep delivering.
          if !self.faulted {
            self.faulted = true;
            return Some(LogEvent::Fault(format!(
              "log subscription fell behind by {missed} snapshots"
            )));
          }
        }
        Err(broadcast::error::RecvError::Closed) => {
          self.rx = None;
          return None;
        }
      }
    }
  }

  fn unsubscribe(&mut self) {
    self.pending = None;
    self.rx = None;
  }
}

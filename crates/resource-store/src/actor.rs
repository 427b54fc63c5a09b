//! # Generic Store Actor
//!
//! This module defines the `StoreActor`, the component that owns a repository and
//! processes store requests sequentially. It is the only code that touches the
//! underlying connection.

use crate::client::StoreClient;
use crate::entity::ResourceEntity;
use crate::error::StoreError;
use crate::message::{Response, StoreRequest};
use crate::repository::Repository;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that serializes access to one repository.
///
/// # Concurrency Model
/// Any number of `StoreClient` clones may send requests concurrently, but the actor
/// handles them one at a time. Each repository call therefore runs alone: inserts get
/// distinct ids and a save is never interleaved with another write. No `Mutex` guards
/// the connection; exclusive ownership inside the actor does.
///
/// Repository calls are blocking, so [`run`](Self::run) is a plain blocking loop meant
/// for `tokio::task::spawn_blocking`.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new(repository, buffer)` returns the actor and its client.
/// 2.  **Run**: move the actor onto a blocking thread.
/// 3.  **Use**: clone the client into whatever needs the store.
///
/// ```rust
/// use resource_store::{ResourceEntity, SqlEntity, SqliteRepository, StoreActor, StoreError};
/// use rusqlite::{types::Value, Row};
///
/// #[derive(Clone, Debug)] struct Note { id: i64, text: String }
/// #[derive(Debug)] struct NoteDraft { text: String }
///
/// impl ResourceEntity for Note {
///     type Id = i64; type Draft = NoteDraft; type Query = ();
///     fn id(&self) -> i64 { self.id }
///     fn revise(&self, d: NoteDraft) -> Self { Self { id: self.id, text: d.text } }
/// }
///
/// impl SqlEntity for Note {
///     const TABLE: &'static str = "notes";
///     const COLUMNS: &'static [&'static str] = &["text"];
///     const SCHEMA: &'static str =
///         "CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY AUTOINCREMENT, text TEXT NOT NULL);";
///     fn from_row(row: &Row<'_>) -> Result<Self, StoreError> {
///         Ok(Self { id: row.get(0)?, text: row.get(1)? })
///     }
///     fn values(&self) -> Vec<Value> { vec![Value::Text(self.text.clone())] }
///     fn draft_values(d: NoteDraft) -> Vec<Value> { vec![Value::Text(d.text)] }
///     fn filter(_: &()) -> (&'static str, Vec<Value>) { ("1 = 1", Vec::new()) }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     let (actor, client) = StoreActor::new(SqliteRepository::<Note>::in_memory()?, 8);
///     let handle = tokio::task::spawn_blocking(move || actor.run());
///
///     let note = client.insert(NoteDraft { text: "hello".into() }).await?;
///     assert_eq!(client.find_by_id(note.id).await?.map(|n| n.text), Some("hello".into()));
///
///     drop(client);
///     handle.await.expect("store thread panicked");
///     Ok(())
/// }
/// ```
pub struct StoreActor<T: ResourceEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    repository: Box<dyn Repository<T>>,
}

impl<T: ResourceEntity> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full,
    /// client calls wait for space. Panics if `buffer_size` is zero.
    pub fn new(repository: impl Repository<T>, buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            repository: Box::new(repository),
        };
        (actor, StoreClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub fn run(mut self) {
        // Just the type name (e.g. "Product" instead of "record_services::model::product::Product")
        let resource = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(resource, "Store started");

        while let Some(msg) = self.receiver.blocking_recv() {
            match msg {
                StoreRequest::FindAll { respond_to } => {
                    let result = self.repository.find_all();
                    if let Ok(records) = &result {
                        debug!(resource, count = records.len(), "FindAll");
                    }
                    Self::reply(resource, "FindAll", respond_to, result);
                }
                StoreRequest::FindById { id, respond_to } => {
                    let result = self.repository.find_by_id(id);
                    if let Ok(found) = &result {
                        debug!(resource, %id, found = found.is_some(), "FindById");
                    }
                    Self::reply(resource, "FindById", respond_to, result);
                }
                StoreRequest::Query { query, respond_to } => {
                    let result = self.repository.query(&query);
                    if let Ok(records) = &result {
                        debug!(resource, ?query, count = records.len(), "Query");
                    }
                    Self::reply(resource, "Query", respond_to, result);
                }
                StoreRequest::Insert { draft, respond_to } => {
                    debug!(resource, ?draft, "Insert");
                    let result = self.repository.insert(draft);
                    if let Ok(record) = &result {
                        info!(resource, id = %record.id(), "Created");
                    }
                    Self::reply(resource, "Insert", respond_to, result);
                }
                StoreRequest::Save { entity, respond_to } => {
                    let id = entity.id();
                    debug!(resource, %id, ?entity, "Save");
                    let result = self.repository.save(entity);
                    if result.is_ok() {
                        info!(resource, %id, "Saved");
                    }
                    Self::reply(resource, "Save", respond_to, result);
                }
                StoreRequest::Delete { entity, respond_to } => {
                    let id = entity.id();
                    let result = self.repository.delete(&entity);
                    if result.is_ok() {
                        info!(resource, %id, "Deleted");
                    }
                    Self::reply(resource, "Delete", respond_to, result);
                }
            }
        }

        info!(resource, "Shutdown");
    }

    fn reply<R>(
        resource: &str,
        op: &'static str,
        respond_to: Response<R>,
        result: Result<R, StoreError>,
    ) {
        if let Err(e) = &result {
            warn!(resource, op, error = %e, "Store operation failed");
        }
        let _ = respond_to.send(result);
    }
}

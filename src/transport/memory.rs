//! In-process stand-in for the remote record collection.
//!
//! [`InMemoryTransport`] behaves like a well-mannered REST backend: it
//! keeps records in insertion order, assigns a `UUIDv4` identifier on
//! create, and answers 404 for identifiers it does not hold. It can be
//! switched offline so every call fails with a connection error, which is
//! how tests exercise the failure paths.
//!
//! # Examples
//!
//! ```
//! use todo_sync::transport::memory::InMemoryTransport;
//! use todo_sync::{Record, RecordTransport};
//!
//! # futures::executor::block_on(async {
//! let transport = InMemoryTransport::with_records(vec![Record::new("1", "buy milk", false)]);
//! let created = transport.create("walk dog").await.unwrap();
//! assert!(!created.completed);
//!
//! transport.set_offline(true);
//! assert!(transport.list().await.is_err());
//! assert_eq!(transport.call_count(), 2);
//! # });
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{Result, TransportError};
use crate::transport::RecordTransport;
use crate::types::{Record, RecordId};

/// Thread-safe in-memory record collection implementing
/// [`RecordTransport`].
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    records: Mutex<IndexMap<RecordId, Record>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryTransport {
    /// Creates an empty, online collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection seeded with `records`, in order. A repeated
    /// identifier overwrites the earlier record in its original position.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let transport = Self::new();
        {
            let mut map = transport.records.lock();
            for record in records {
                map.insert(record.id.clone(), record);
            }
        }
        transport
    }

    /// Makes every subsequent call fail (`true`) or succeed (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether calls currently fail.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Number of calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The server-side records, in order.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().values().cloned().collect()
    }

    /// Inserts or overwrites a record server-side without counting a call,
    /// as another client would.
    pub fn upsert(&self, record: Record) {
        self.records.lock().insert(record.id.clone(), record);
    }

    /// Deletes a record server-side without counting a call.
    pub fn delete_remote(&self, id: &RecordId) -> Option<Record> {
        self.records.lock().shift_remove(id)
    }

    fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline() {
            return Err(TransportError::Connection {
                message: "in-memory transport is offline".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: &RecordId) -> TransportError {
        TransportError::Http {
            status: 404,
            body: format!("no record with id {id}"),
        }
    }
}

#[async_trait]
impl RecordTransport for InMemoryTransport {
    async fn list(&self) -> Result<Vec<Record>> {
        self.begin_call()?;
        Ok(self.records())
    }

    async fn create(&self, task: &str) -> Result<Record> {
        self.begin_call()?;
        let record = Record::new(Uuid::new_v4().to_string(), task, false);
        self.records.lock().insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, task: &str, completed: bool) -> Result<Record> {
        self.begin_call()?;
        let mut records = self.records.lock();
        let record = records.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        record.task = task.to_string();
        record.completed = completed;
        Ok(record.clone())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        self.begin_call()?;
        self.records
            .lock()
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

//! Transport adapters for the remote record collection.
//!
//! [`RecordTransport`] is the boundary between the synchronization layer
//! and the network. Each method performs exactly one exchange: no retries,
//! no timeouts, no caching. A failure is returned as a
//! [`TransportError`], never as a panic.
//!
//! # Adapters
//!
//! - [`HttpTransport`](http::HttpTransport) -- JSON over HTTP with
//!   `reqwest`. Available behind the `http-client` feature (on by default).
//! - [`InMemoryTransport`](memory::InMemoryTransport) -- an in-process
//!   stand-in for the remote store, with failure injection. Used by tests
//!   and the `--offline` mode of the command-line front end.

#[cfg(feature = "http-client")]
pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Record, RecordId};

/// One-shot exchanges with the remote collection.
///
/// Implementations are shared as `Arc<dyn RecordTransport>` by
/// [`SyncController`](crate::SyncController).
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use todo_sync::{Record, RecordId, RecordTransport, Result, TransportError};
///
/// /// A transport whose endpoint is always down.
/// struct Unreachable;
///
/// #[async_trait]
/// impl RecordTransport for Unreachable {
///     async fn list(&self) -> Result<Vec<Record>> {
///         Err(down())
///     }
///     async fn create(&self, _task: &str) -> Result<Record> {
///         Err(down())
///     }
///     async fn update(&self, _id: &RecordId, _task: &str, _completed: bool) -> Result<Record> {
///         Err(down())
///     }
///     async fn remove(&self, _id: &RecordId) -> Result<()> {
///         Err(down())
///     }
/// }
///
/// fn down() -> TransportError {
///     TransportError::Connection { message: "unreachable".to_string() }
/// }
/// ```
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// Fetches the whole collection in server order.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Creates a record with `task` as its text. The server assigns the
    /// identifier and defaults `completed` to `false`.
    async fn create(&self, task: &str) -> Result<Record>;

    /// Replaces the text and flag of record `id`, returning the server's
    /// canonical version.
    async fn update(&self, id: &RecordId, task: &str, completed: bool) -> Result<Record>;

    /// Deletes record `id`.
    async fn remove(&self, id: &RecordId) -> Result<()>;
}

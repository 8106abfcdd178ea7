//! Client-side state synchronizer for a remote collection of task records.
//!
//! This crate keeps an in-memory list of task records consistent with a
//! REST collection endpoint (`/api/todos`) across the four remote operations
//! (list, create, update, delete), and tracks which single record, if any,
//! is being edited locally.
//!
//! # Overview
//!
//! The local state is never mutated ahead of the server: every remote
//! operation awaits the canonical record returned by the endpoint and only
//! then applies it. A failed call is logged and absorbed, leaving the state
//! exactly as it was, so the user can simply retry.
//!
//! # Module Organization
//!
//! - [`types`] - Wire types ([`Record`], [`RecordId`]) and request bodies
//! - [`error`] - Transport and configuration errors
//! - [`config`] - TOML/environment configuration for the remote endpoint
//! - [`transport`] - The [`RecordTransport`] trait and its adapters
//! - [`store`] - The ordered local record collection
//! - [`session`] - Single-record edit session tracking
//! - [`state`] - The application state container and change notifications
//! - [`controller`] - [`SyncController`], which orchestrates all of the above
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use todo_sync::transport::memory::InMemoryTransport;
//! use todo_sync::{Outcome, SyncController};
//!
//! # futures::executor::block_on(async {
//! let transport = Arc::new(InMemoryTransport::new());
//! let controller = SyncController::new(transport);
//!
//! controller.load().await;
//! controller.set_input("buy milk");
//! assert!(matches!(controller.add().await, Outcome::Applied));
//!
//! let records = controller.records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].task, "buy milk");
//! assert!(controller.input().is_empty());
//! # });
//! ```

pub mod config;
pub mod controller;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod session;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

// Re-exports for ergonomic access
pub use config::SyncConfig;
pub use controller::{Outcome, SkipReason, SubscriptionId, SyncController};
pub use error::{ConfigError, Result, TransportError};
pub use session::{EditSession, EditSessionTracker};
pub use state::{AppState, Operation, StateChange};
pub use store::RecordStore;
pub use transport::RecordTransport;
pub use types::{Record, RecordId};

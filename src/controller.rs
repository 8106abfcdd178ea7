//! Synchronization controller.
//!
//! [`SyncController`] owns the [`AppState`] and a shared
//! [`RecordTransport`]. Every remote-backed operation follows the same
//! shape:
//!
//! 1. Read what the call needs from the state (short read lock).
//! 2. Await the transport. No lock is held across the call.
//! 3. On success, apply exactly one mutation under a single write lock and
//!    notify subscribers. On failure, log, notify, and leave state as is.
//!
//! Operations take `&self`, so several may be outstanding at once. Two
//! outstanding operations on the same record resolve in whatever order the
//! transport answers, and the last one to resolve wins. Mutations that find
//! their record gone tolerate it as a no-op.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::TransportError;
use crate::session::EditSession;
use crate::state::{AppState, Operation, StateChange};
use crate::transport::RecordTransport;
use crate::types::{Record, RecordId};

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Add with empty or whitespace-only input. No call was made.
    EmptyInput,
    /// The requested identifier is not in the store. No call was made.
    UnknownRecord,
    /// Save requested with no active edit session. No call was made.
    NoActiveSession,
    /// The server confirmed the change, but the record had already left
    /// the store by the time the answer arrived.
    StaleRecord,
    /// The server returned a record whose identifier is already held.
    DuplicateRecord,
}

/// Result of a controller operation.
///
/// Transport failures are absorbed: they are reported here and to
/// subscribers, but the state is exactly what it was before the call.
#[derive(Debug)]
#[must_use]
pub enum Outcome {
    /// State changed as requested.
    Applied,
    /// Nothing changed, for the given reason.
    Skipped(SkipReason),
    /// The remote call failed. Nothing changed.
    Failed(TransportError),
}

impl Outcome {
    /// Whether the requested change was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the remote call failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Handle returned by [`SyncController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&StateChange) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

/// Keeps the local record list consistent with the remote collection.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use todo_sync::transport::memory::InMemoryTransport;
/// use todo_sync::{Record, RecordId, SyncController};
///
/// # futures::executor::block_on(async {
/// let transport = Arc::new(InMemoryTransport::with_records(vec![Record::new(
///     "1", "buy milk", false,
/// )]));
/// let controller = SyncController::new(transport);
/// let _ = controller.load().await;
///
/// let id = RecordId::from("1");
/// let _ = controller.toggle_completed(&id).await;
/// assert!(controller.records()[0].completed);
///
/// let _ = controller.begin_edit(&id);
/// let _ = controller.update_edit_draft("buy bread");
/// let _ = controller.save_edit().await;
/// assert_eq!(controller.records()[0].task, "buy bread");
/// assert!(controller.edit_session().is_none());
/// # });
/// ```
pub struct SyncController {
    transport: Arc<dyn RecordTransport>,
    state: RwLock<AppState>,
    subscribers: RwLock<Subscribers>,
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("state", &*self.state.read())
            .field("subscribers", &self.subscribers.read().entries.len())
            .finish_non_exhaustive()
    }
}

impl SyncController {
    /// Creates a controller with empty state.
    pub fn new(transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            transport,
            state: RwLock::new(AppState::new()),
            subscribers: RwLock::new(Subscribers::default()),
        }
    }

    // ---- Reads ----

    /// Owned copy of the whole state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    /// Records in display order.
    pub fn records(&self) -> Vec<Record> {
        self.state.read().records().to_vec()
    }

    /// Current new-task input text.
    pub fn input(&self) -> String {
        self.state.read().input().to_string()
    }

    /// The active edit session.
    pub fn edit_session(&self) -> Option<EditSession> {
        self.state.read().edit_session().cloned()
    }

    // ---- Subscriptions ----

    /// Registers `callback` to receive every [`StateChange`].
    ///
    /// Callbacks run on the task that applied the change, after the state
    /// lock has been released, so they may read [`snapshot`](Self::snapshot).
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.write();
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        subscribers.entries.push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(entry, _)| *entry != id);
        subscribers.entries.len() != before
    }

    fn notify(&self, change: StateChange) {
        let callbacks: Vec<Subscriber> = self
            .subscribers
            .read()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&change);
        }
    }

    fn notify_all(&self, changes: Vec<StateChange>) {
        for change in changes {
            self.notify(change);
        }
    }

    fn fail(&self, operation: Operation, id: Option<&RecordId>, err: TransportError) -> Outcome {
        match id {
            Some(id) => tracing::error!(
                operation = %operation,
                record_id = %id,
                category = err.category(),
                error = %err,
                "Remote operation failed"
            ),
            None => tracing::error!(
                operation = %operation,
                category = err.category(),
                error = %err,
                "Remote operation failed"
            ),
        }
        self.notify(StateChange::OperationFailed {
            operation,
            message: err.to_string(),
        });
        Outcome::Failed(err)
    }

    // ---- Remote-backed operations ----

    /// Replaces the store with the remote collection.
    ///
    /// If an edit session targets a record the server no longer returns,
    /// the session is ended.
    pub async fn load(&self) -> Outcome {
        let records = match self.transport.list().await {
            Ok(records) => records,
            Err(err) => return self.fail(Operation::Load, None, err),
        };

        let (count, dropped, orphan) = {
            let mut state = self.state.write();
            let dropped = state.store_mut().replace_all(records);
            let orphan = state.drop_orphaned_session();
            (state.store().len(), dropped, orphan)
        };

        if dropped > 0 {
            tracing::warn!(dropped, "Server returned repeated record ids; kept first of each");
        }
        tracing::info!(count, "Loaded records");

        let mut changes = vec![StateChange::RecordsLoaded { count }];
        if let Some(id) = orphan {
            tracing::debug!(record_id = %id, "Edit target vanished on reload");
            changes.push(StateChange::EditEnded { id });
        }
        self.notify_all(changes);
        Outcome::Applied
    }

    /// Replaces the new-task input text.
    pub fn set_input(&self, text: impl Into<String>) {
        self.state.write().set_input(text.into());
        self.notify(StateChange::InputChanged);
    }

    /// Creates a record from the input text.
    ///
    /// Whitespace-only input is rejected without a call. The text is sent
    /// untrimmed. On success the returned record is appended and the input
    /// cleared.
    pub async fn add(&self) -> Outcome {
        let task = self.state.read().input().to_string();
        if task.trim().is_empty() {
            return Outcome::Skipped(SkipReason::EmptyInput);
        }

        let record = match self.transport.create(&task).await {
            Ok(record) => record,
            Err(err) => return self.fail(Operation::Add, None, err),
        };

        let id = record.id.clone();
        let appended = {
            let mut state = self.state.write();
            state.clear_input();
            state.store_mut().append(record)
        };

        if !appended {
            tracing::warn!(record_id = %id, "Created record id already present; not appended");
            self.notify(StateChange::InputChanged);
            return Outcome::Skipped(SkipReason::DuplicateRecord);
        }

        tracing::debug!(record_id = %id, "Appended created record");
        self.notify_all(vec![
            StateChange::RecordAppended { id },
            StateChange::InputChanged,
        ]);
        Outcome::Applied
    }

    /// Flips the completion flag of record `id`.
    ///
    /// The text and flag sent are read from the store immediately before
    /// the call, so a toggle never resends a stale flag.
    pub async fn toggle_completed(&self, id: &RecordId) -> Outcome {
        let current = self.state.read().store().get(id).cloned();
        let Some(current) = current else {
            tracing::debug!(record_id = %id, "Toggle on unknown record ignored");
            return Outcome::Skipped(SkipReason::UnknownRecord);
        };

        match self
            .transport
            .update(id, &current.task, !current.completed)
            .await
        {
            Ok(record) => self.apply_replacement(id, record),
            Err(err) => self.fail(Operation::Toggle, Some(id), err),
        }
    }

    /// Puts record `id` into edit mode with its current text as the draft.
    /// Any other session is discarded. No remote call.
    pub fn begin_edit(&self, id: &RecordId) -> Outcome {
        {
            let mut state = self.state.write();
            let Some(task) = state.store().get(id).map(|record| record.task.clone()) else {
                tracing::debug!(record_id = %id, "Edit on unknown record ignored");
                return Outcome::Skipped(SkipReason::UnknownRecord);
            };
            state.session_mut().begin(id.clone(), task);
        }
        self.notify(StateChange::EditStarted { id: id.clone() });
        Outcome::Applied
    }

    /// Replaces the draft of the active session. No remote call.
    pub fn update_edit_draft(&self, text: impl Into<String>) -> Outcome {
        let target = {
            let mut state = self.state.write();
            if !state.session_mut().update_draft(text) {
                return Outcome::Skipped(SkipReason::NoActiveSession);
            }
            state.session().target().cloned()
        };
        if let Some(id) = target {
            self.notify(StateChange::DraftChanged { id });
        }
        Outcome::Applied
    }

    /// Sends the active session's draft, keeping the record's current flag.
    ///
    /// On success the record is replaced and the session for it ended. On
    /// failure the session stays active with its draft.
    pub async fn save_edit(&self) -> Outcome {
        let request = {
            let state = self.state.read();
            state.edit_session().map(|session| {
                let completed = state
                    .store()
                    .get(&session.target)
                    .map(|record| record.completed);
                (session.target.clone(), session.draft.clone(), completed)
            })
        };
        let Some((id, draft, completed)) = request else {
            return Outcome::Skipped(SkipReason::NoActiveSession);
        };
        let Some(completed) = completed else {
            tracing::warn!(record_id = %id, "Edit target missing from store; save skipped");
            return Outcome::Skipped(SkipReason::UnknownRecord);
        };

        let record = match self.transport.update(&id, &draft, completed).await {
            Ok(record) => record,
            Err(err) => return self.fail(Operation::SaveEdit, Some(&id), err),
        };

        let (replaced, ended) = {
            let mut state = self.state.write();
            let replaced = state.store_mut().replace(&id, record);
            let ended = state.session_mut().end_if_target(&id);
            (replaced, ended)
        };

        let mut changes = Vec::new();
        if replaced {
            changes.push(StateChange::RecordReplaced { id: id.clone() });
        }
        if ended {
            changes.push(StateChange::EditEnded { id: id.clone() });
        }
        self.notify_all(changes);

        if replaced {
            Outcome::Applied
        } else {
            tracing::debug!(record_id = %id, "Saved record no longer in store");
            Outcome::Skipped(SkipReason::StaleRecord)
        }
    }

    /// Leaves edit mode without saving. No remote call.
    pub fn cancel_edit(&self) -> Outcome {
        let ended = self.state.write().session_mut().end();
        match ended {
            Some(session) => {
                self.notify(StateChange::EditEnded { id: session.target });
                Outcome::Applied
            }
            None => Outcome::Skipped(SkipReason::NoActiveSession),
        }
    }

    /// Deletes record `id` remotely, then locally.
    ///
    /// An edit session targeting the deleted record is ended with it.
    pub async fn delete(&self, id: &RecordId) -> Outcome {
        if let Err(err) = self.transport.remove(id).await {
            return self.fail(Operation::Delete, Some(id), err);
        }

        let (removed, ended) = {
            let mut state = self.state.write();
            let removed = state.store_mut().remove(id).is_some();
            let ended = state.session_mut().end_if_target(id);
            (removed, ended)
        };

        let mut changes = Vec::new();
        if removed {
            changes.push(StateChange::RecordRemoved { id: id.clone() });
        }
        if ended {
            changes.push(StateChange::EditEnded { id: id.clone() });
        }
        self.notify_all(changes);

        if removed {
            Outcome::Applied
        } else {
            tracing::debug!(record_id = %id, "Deleted record was not in store");
            Outcome::Skipped(SkipReason::StaleRecord)
        }
    }

    fn apply_replacement(&self, id: &RecordId, record: Record) -> Outcome {
        let replaced = self.state.write().store_mut().replace(id, record);
        if !replaced {
            tracing::debug!(record_id = %id, "Updated record no longer in store");
            return Outcome::Skipped(SkipReason::StaleRecord);
        }
        self.notify(StateChange::RecordReplaced { id: id.clone() });
        Outcome::Applied
    }
}

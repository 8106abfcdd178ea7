//! Application state container and change notifications.
//!
//! [`AppState`] bundles the three pieces of mutable UI state: the record
//! store, the new-task input, and the edit session. Readers get owned
//! snapshots with read-only accessors; mutation is crate-private and
//! routed through [`SyncController`](crate::SyncController).

use std::fmt;

use crate::session::{EditSession, EditSessionTracker};
use crate::store::RecordStore;
use crate::types::{Record, RecordId};

/// Snapshot of everything a view needs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    store: RecordStore,
    input: String,
    session: EditSessionTracker,
}

impl AppState {
    /// Creates empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The record collection.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Records in display order.
    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    /// Current new-task input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The edit session tracker.
    pub fn session(&self) -> &EditSessionTracker {
        &self.session
    }

    /// The active edit session.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.session.session()
    }

    /// Whether `id` is being edited.
    pub fn is_editing(&self, id: &RecordId) -> bool {
        self.session.is_active(id)
    }

    pub(crate) fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    pub(crate) fn session_mut(&mut self) -> &mut EditSessionTracker {
        &mut self.session
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Ends the edit session if its target has left the store.
    pub(crate) fn drop_orphaned_session(&mut self) -> Option<RecordId> {
        let orphan = self
            .session
            .target()
            .filter(|target| !self.store.contains(target))
            .cloned()?;
        self.session.end();
        Some(orphan)
    }
}

/// The remote-backed operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Full fetch of the collection.
    Load,
    /// Create from the input text.
    Add,
    /// Flip a record's completion flag.
    Toggle,
    /// Save the edit session's draft.
    SaveEdit,
    /// Delete a record.
    Delete,
}

impl Operation {
    /// Stable lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Toggle => "toggle",
            Self::SaveEdit => "save_edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change applied to [`AppState`], delivered to subscribers after the
/// state has been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The collection was replaced by a full fetch.
    RecordsLoaded {
        /// Number of records now held.
        count: usize,
    },
    /// A created record was appended.
    RecordAppended {
        /// The new record's identifier.
        id: RecordId,
    },
    /// A record was replaced by its server-confirmed version.
    RecordReplaced {
        /// The replaced record's identifier.
        id: RecordId,
    },
    /// A record was deleted.
    RecordRemoved {
        /// The deleted record's identifier.
        id: RecordId,
    },
    /// The new-task input text changed.
    InputChanged,
    /// An edit session began.
    EditStarted {
        /// Record now in edit mode.
        id: RecordId,
    },
    /// The active session's draft changed.
    DraftChanged {
        /// Record in edit mode.
        id: RecordId,
    },
    /// The edit session ended (saved, cancelled, or orphaned).
    EditEnded {
        /// Record that left edit mode.
        id: RecordId,
    },
    /// A remote call failed. State was left untouched.
    OperationFailed {
        /// Which operation failed.
        operation: Operation,
        /// Human-readable failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphaned_session_is_dropped() {
        let mut state = AppState::new();
        state.store_mut().append(Record::new("1", "x", false));
        state.session_mut().begin(RecordId::from("2"), "gone");

        assert_eq!(state.drop_orphaned_session(), Some(RecordId::from("2")));
        assert!(state.edit_session().is_none());
    }

    #[test]
    fn live_session_is_kept() {
        let mut state = AppState::new();
        state.store_mut().append(Record::new("1", "x", false));
        state.session_mut().begin(RecordId::from("1"), "x");

        assert_eq!(state.drop_orphaned_session(), None);
        assert!(state.is_editing(&RecordId::from("1")));
    }

    #[test]
    fn input_round_trips_through_setters() {
        let mut state = AppState::new();
        state.set_input("draft".to_string());
        assert_eq!(state.input(), "draft");
        state.clear_input();
        assert_eq!(state.input(), "");
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::SaveEdit.to_string(), "save_edit");
        assert_eq!(Operation::Load.as_str(), "load");
    }
}

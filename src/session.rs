//! Single-record edit session tracking.
//!
//! At most one record is in edit mode at a time. Beginning an edit on a
//! record discards any other session without merging its draft.

use crate::types::RecordId;

/// The record being edited and its unsaved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Record under edit.
    pub target: RecordId,
    /// Unsaved replacement text.
    pub draft: String,
}

/// Tracks the active [`EditSession`], if any.
///
/// # Examples
///
/// ```
/// use todo_sync::{EditSessionTracker, RecordId};
///
/// let one = RecordId::from("1");
/// let mut tracker = EditSessionTracker::new();
/// tracker.begin(one.clone(), "buy milk");
/// tracker.update_draft("buy bread");
/// assert!(tracker.is_active(&one));
/// assert_eq!(tracker.draft_text(), Some("buy bread"));
///
/// tracker.end();
/// assert!(!tracker.is_active(&one));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSessionTracker {
    active: Option<EditSession>,
}

impl EditSessionTracker {
    /// Creates a tracker with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing `target` with `initial_text` as the draft, replacing
    /// any active session.
    pub fn begin(&mut self, target: RecordId, initial_text: impl Into<String>) {
        self.active = Some(EditSession {
            target,
            draft: initial_text.into(),
        });
    }

    /// Replaces the draft of the active session. Returns `false` if there
    /// is none.
    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match self.active.as_mut() {
            Some(session) => {
                session.draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Clears the active session, returning it.
    pub fn end(&mut self) -> Option<EditSession> {
        self.active.take()
    }

    /// Clears the session only if it targets `id`.
    pub fn end_if_target(&mut self, id: &RecordId) -> bool {
        if self.is_active(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Whether `id` is the record in edit mode.
    pub fn is_active(&self, id: &RecordId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.target == *id)
    }

    /// Draft text of the active session.
    pub fn draft_text(&self) -> Option<&str> {
        self.active.as_ref().map(|session| session.draft.as_str())
    }

    /// Identifier of the record in edit mode.
    pub fn target(&self) -> Option<&RecordId> {
        self.active.as_ref().map(|session| &session.target)
    }

    /// The active session.
    pub fn session(&self) -> Option<&EditSession> {
        self.active.as_ref()
    }
}

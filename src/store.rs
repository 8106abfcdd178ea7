//! Ordered local collection of records.
//!
//! [`RecordStore`] is the client's cache of the remote collection. Order is
//! the order of the last full fetch, with newly created records appended.
//! Mutations substitute or remove a record in place and never reorder the
//! survivors. Identifiers are unique within the store.
//!
//! Lookups are linear scans: the collection is a small UI list, not a
//! scalability target.

use crate::types::{Record, RecordId};

/// Ordered, identifier-unique sequence of [`Record`]s.
///
/// Mutators report whether they changed anything instead of failing:
/// a missing or duplicate identifier is tolerated as a no-op.
///
/// # Examples
///
/// ```
/// use todo_sync::{Record, RecordId, RecordStore};
///
/// let mut store = RecordStore::new();
/// assert!(store.append(Record::new("1", "buy milk", false)));
/// assert!(!store.append(Record::new("1", "duplicate", false)));
///
/// assert!(store.replace(&RecordId::from("1"), Record::new("1", "buy milk", true)));
/// assert!(store.get(&RecordId::from("1")).unwrap().completed);
///
/// assert!(store.remove(&RecordId::from("1")).is_some());
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the whole sequence.
    ///
    /// If `records` repeats an identifier, only its first occurrence is
    /// kept. Returns the number of duplicates dropped.
    pub fn replace_all(&mut self, records: Vec<Record>) -> usize {
        let incoming = records.len();
        self.records.clear();
        for record in records {
            if !self.contains(&record.id) {
                self.records.push(record);
            }
        }
        incoming - self.records.len()
    }

    /// Adds `record` at the end. Refused (returns `false`) if its
    /// identifier is already present.
    pub fn append(&mut self, record: Record) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Substitutes the record with identifier `id` in place. Returns `false`
    /// and leaves the store untouched if `id` is not present.
    ///
    /// The server may not change identifiers, but if the replacement carries
    /// a different one that already belongs to another record, the
    /// replacement is refused as well.
    pub fn replace(&mut self, id: &RecordId, record: Record) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        if record.id != *id && self.contains(&record.id) {
            return false;
        }
        self.records[index] = record;
        true
    }

    /// Removes the record with identifier `id`, returning it. `None` if it
    /// was not present.
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        let index = self.position(id)?;
        Some(self.records.remove(index))
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == *id)
    }

    /// Whether a record with identifier `id` is present.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    /// Records in display order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterates records in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Identifiers in display order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == *id)
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

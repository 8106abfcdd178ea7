//! Task record as returned by the remote collection.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque record identifier assigned by the remote store.
///
/// The client never invents identifiers; it only echoes back what the
/// endpoint returned. Numeric identifiers are accepted on the wire and
/// held as their decimal text.
///
/// # Examples
///
/// ```
/// use todo_sync::RecordId;
///
/// let id: RecordId = serde_json::from_str("42").unwrap();
/// assert_eq!(id.as_str(), "42");
///
/// let id: RecordId = serde_json::from_str("\"65f1c0de\"").unwrap();
/// assert_eq!(id, RecordId::from("65f1c0de"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Text(text) => Self(text),
            WireId::Unsigned(n) => Self(n.to_string()),
            WireId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// One task entry: identifier, task text and completion flag.
///
/// Decodes both `id` and the document-store spelling `_id`. When both are
/// present, `id` wins.
///
/// # Examples
///
/// ```
/// use todo_sync::{Record, RecordId};
///
/// let record: Record =
///     serde_json::from_str(r#"{"_id":"1","task":"buy milk","__v":0}"#).unwrap();
/// assert_eq!(record.id, RecordId::from("1"));
/// assert_eq!(record.task, "buy milk");
/// assert!(!record.completed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct Record {
    /// Server-assigned identifier.
    pub id: RecordId,

    /// Task text.
    pub task: String,

    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
}

/// Record as it appears on the wire, with either identifier spelling.
#[derive(Deserialize)]
struct WireRecord {
    id: Option<RecordId>,
    #[serde(rename = "_id")]
    document_id: Option<RecordId>,
    task: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<WireRecord> for Record {
    type Error = String;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.document_id)
            .ok_or_else(|| "missing field `id` or `_id`".to_string())?;
        Ok(Self {
            id,
            task: wire.task,
            completed: wire.completed,
        })
    }
}

impl Record {
    /// Builds a record. Mostly useful for tests and in-process transports;
    /// real identifiers come from the endpoint.
    pub fn new(id: impl Into<RecordId>, task: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            completed,
        }
    }
}

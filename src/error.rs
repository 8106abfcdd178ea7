//! Error types for transport exchanges and configuration loading.
//!
//! [`TransportError`] is the only failure the synchronization layer reacts
//! to. Its variants exist for diagnostics: the controller logs them and
//! otherwise treats every variant the same way.

use std::path::PathBuf;

/// Result alias for transport operations.
pub type Result<T, E = TransportError> = std::result::Result<T, E>;

/// Failure of a single exchange with the remote collection.
///
/// # Examples
///
/// ```
/// use todo_sync::TransportError;
///
/// let err = TransportError::Http {
///     status: 404,
///     body: "not found".to_string(),
/// };
/// assert_eq!(err.to_string(), "HTTP 404: not found");
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint could not be reached (DNS, TCP connect, TLS, or an
    /// interrupted body read).
    #[error("connection error: {message}")]
    Connection {
        /// Underlying client error message.
        message: String,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built for the given identifier.
    #[error("invalid request URL: {message}")]
    InvalidUrl {
        /// Why the URL was rejected.
        message: String,
    },
}

impl TransportError {
    /// HTTP status carried by this error, if the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short category label used in log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection",
            Self::Http { .. } => "http",
            Self::Decode(_) => "decode",
            Self::InvalidUrl { .. } => "url",
        }
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connection {
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading a [`SyncConfig`](crate::SyncConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `base_url` and `collection_path` do not form a usable URL.
    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

//! Endpoint configuration loaded from TOML and the environment.
//!
//! Every field has a default, so an empty file (or no file at all) points
//! the client at a local development server.
//!
//! # Example TOML
//!
//! ```toml
//! base_url = "https://todos.example.com"
//! collection_path = "/api/todos"
//! log_filter = "todo_sync=debug"
//! ```
//!
//! `TODO_SYNC_BASE_URL` and `TODO_SYNC_COLLECTION_PATH` override the file
//! when [`SyncConfig::with_env_overrides`] is applied.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding [`SyncConfig::base_url`].
pub const BASE_URL_ENV: &str = "TODO_SYNC_BASE_URL";

/// Environment variable overriding [`SyncConfig::collection_path`].
pub const COLLECTION_PATH_ENV: &str = "TODO_SYNC_COLLECTION_PATH";

/// Default server origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default collection path on the server.
pub const DEFAULT_COLLECTION_PATH: &str = "/api/todos";

/// Where the remote collection lives and how to log.
///
/// # Defaults
///
/// | Setting           | Default                 |
/// |-------------------|-------------------------|
/// | `base_url`        | `http://localhost:5000` |
/// | `collection_path` | `/api/todos`            |
/// | `log_filter`      | none (`RUST_LOG`/`info`) |
///
/// # Examples
///
/// ```
/// use todo_sync::SyncConfig;
///
/// let config = SyncConfig::from_toml_str(r#"base_url = "http://10.0.0.5:8080""#).unwrap();
/// assert_eq!(
///     config.collection_url().unwrap().as_str(),
///     "http://10.0.0.5:8080/api/todos"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Server origin, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Path of the collection resource, joined onto `base_url`.
    pub collection_path: String,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
            log_filter: None,
        }
    }
}

impl SyncConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies `TODO_SYNC_*` environment overrides from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(path) = lookup(COLLECTION_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.collection_path = path;
        }
        self
    }

    /// Full URL of the collection resource.
    ///
    /// An absolute `collection_path` replaces any path on `base_url`; a
    /// relative one is resolved against it.
    pub fn collection_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;
        let url = base
            .join(&self.collection_path)
            .map_err(|source| ConfigError::InvalidUrl {
                url: format!("{}{}", self.base_url, self.collection_path),
                source,
            })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(
            config.collection_url().unwrap().as_str(),
            "http://localhost:5000/api/todos"
        );
    }

    #[test]
    fn all_fields_parse() {
        let config = SyncConfig::from_toml_str(
            r#"
base_url = "https://todos.example.com"
collection_path = "/v2/items"
log_filter = "todo_sync=debug"
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://todos.example.com");
        assert_eq!(config.collection_path, "/v2/items");
        assert_eq!(config.log_filter.as_deref(), Some("todo_sync=debug"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SyncConfig::from_toml_str("timeout_ms = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            (BASE_URL_ENV, "http://override:9000"),
            (COLLECTION_PATH_ENV, "  "),
        ]
        .into_iter()
        .collect();
        let config =
            SyncConfig::default().with_overrides_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://override:9000");
        assert_eq!(config.collection_path, DEFAULT_COLLECTION_PATH);
    }

    #[test]
    fn relative_collection_path_resolves_against_base_path() {
        let config = SyncConfig {
            base_url: "http://host/app/".to_string(),
            collection_path: "api/todos".to_string(),
            log_filter: None,
        };
        assert_eq!(
            config.collection_url().unwrap().as_str(),
            "http://host/app/api/todos"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let config = SyncConfig {
            base_url: "not a url".to_string(),
            ..SyncConfig::default()
        };
        assert!(matches!(
            config.collection_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn non_hierarchical_base_url_is_reported() {
        let config = SyncConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..SyncConfig::default()
        };
        assert!(config.collection_url().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo-sync.toml");
        std::fs::write(&path, "collection_path = \"/tasks\"\n").unwrap();
        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.collection_path, "/tasks");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SyncConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

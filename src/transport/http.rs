//! JSON-over-HTTP transport backed by `reqwest`.
//!
//! | Operation | Method | Path                  | Body                  |
//! |-----------|--------|-----------------------|-----------------------|
//! | list      | GET    | `{collection}`        | --                    |
//! | create    | POST   | `{collection}`        | `{task}`              |
//! | update    | PUT    | `{collection}/{id}`   | `{task, completed}`   |
//! | remove    | DELETE | `{collection}/{id}`   | --                    |
//!
//! Any non-2xx status is a failure. The delete response body is ignored.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::SyncConfig;
use crate::error::{ConfigError, Result, TransportError};
use crate::transport::RecordTransport;
use crate::types::{CreateRecordBody, Record, RecordId, UpdateRecordBody};

/// [`RecordTransport`] speaking JSON to a REST collection endpoint.
///
/// # Examples
///
/// ```
/// use todo_sync::transport::http::HttpTransport;
/// use todo_sync::SyncConfig;
///
/// let transport = HttpTransport::from_config(&SyncConfig::default()).unwrap();
/// assert_eq!(
///     transport.collection_url().as_str(),
///     "http://localhost:5000/api/todos"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    collection: Url,
}

impl HttpTransport {
    /// Creates a transport for the collection at `collection`.
    pub fn new(collection: Url) -> Self {
        Self::with_client(Client::new(), collection)
    }

    /// Creates a transport sharing an existing `reqwest` client.
    pub fn with_client(client: Client, collection: Url) -> Self {
        Self { client, collection }
    }

    /// Creates a transport for the collection named by `config`.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.collection_url()?))
    }

    /// URL of the collection resource.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of one record: the collection URL with `id` appended as a
    /// percent-encoded path segment.
    pub fn item_url(&self, id: &RecordId) -> Result<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl {
                message: format!("{} cannot carry path segments", self.collection),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(method = %method, url = %url, "Sending request");
        self.client.request(method, url)
    }

    /// Sends the request and turns non-2xx statuses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Request rejected");
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    async fn list(&self) -> Result<Vec<Record>> {
        let request = self.request(Method::GET, self.collection.clone());
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn create(&self, task: &str) -> Result<Record> {
        let request = self
            .request(Method::POST, self.collection.clone())
            .json(&CreateRecordBody { task });
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &RecordId, task: &str, completed: bool) -> Result<Record> {
        let request = self
            .request(Method::PUT, self.item_url(id)?)
            .json(&UpdateRecordBody { task, completed });
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        let request = self.request(Method::DELETE, self.item_url(id)?);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(collection: &str) -> HttpTransport {
        HttpTransport::new(Url::parse(collection).unwrap())
    }

    #[test]
    fn item_url_appends_segment() {
        let t = transport("http://localhost:5000/api/todos");
        let url = t.item_url(&RecordId::from("65f1c0de")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/todos/65f1c0de");
    }

    #[test]
    fn item_url_tolerates_trailing_slash() {
        let t = transport("http://localhost:5000/api/todos/");
        let url = t.item_url(&RecordId::from("7")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/todos/7");
    }

    #[test]
    fn item_url_encodes_reserved_characters() {
        let t = transport("http://localhost:5000/api/todos");
        let url = t.item_url(&RecordId::from("a/b c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/todos/a%2Fb%20c");
    }
}

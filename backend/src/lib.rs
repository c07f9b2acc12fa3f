use std::time::Duration;

use indexmap::IndexMap;
use reqwest::{header::CONTENT_TYPE, Method, Url};
use rp_error::{Error, Result};
use serde_json::{json, Value};

/// Header carrying the administrative credential on schema calls.
pub const ADMIN_KEY_HEADER: &str = "dpd-ssh-key";

/// Status and decoded body of a 2xx backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    status: u16,
    body: Value,
}

impl BackendResponse {
    pub fn new(status: &u16, body: Value) -> Self {
        Self {
            status: *status,
            body,
        }
    }

    pub fn status(&self) -> &u16 {
        &self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Client for the document-storage backend.
///
/// Every call is a single attempt. A reply with a non-2xx status becomes
/// [`Error::BackendError`] carrying the decoded body; a transport failure
/// becomes [`Error::BackendUnreachable`].
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    admin_key: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str, admin_key: &str, timeout: &Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| Error::validation(format!("Invalid backend URL {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "Backend URL {base_url} cannot be used as a base"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(*timeout);
        }
        let http_client = builder
            .build()
            .map_err(|err| Error::validation(format!("Invalid backend client: {err}")))?;

        Ok(Self {
            base_url,
            admin_key: admin_key.to_owned(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `PUT /__resources/<internal id>` with the full updated descriptor.
    pub async fn rename_collection(
        &self,
        internal_id: &str,
        descriptor: &Value,
    ) -> Result<BackendResponse> {
        let url = self.url(&["__resources", internal_id]);
        self.send(Method::PUT, url, descriptor, true).await
    }

    /// `POST /<collection>/rename` so stored documents get their fields renamed.
    pub async fn rename_property(
        &self,
        collection: &str,
        renames: &IndexMap<String, String>,
    ) -> Result<BackendResponse> {
        let url = self.url(&[collection, "rename"]);
        self.send(Method::POST, url, &json!({ "properties": renames }), false)
            .await
    }

    pub async fn create_document(&self, collection: &str, body: &Value) -> Result<BackendResponse> {
        let url = self.url(&[collection]);
        self.send(Method::POST, url, body, false).await
    }

    pub async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        body: &Value,
    ) -> Result<BackendResponse> {
        let url = self.url(&[collection, document_id]);
        self.send(Method::PUT, url, body, false).await
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: &Value,
        admin: bool,
    ) -> Result<BackendResponse> {
        rp_log::debug(None, format!("BackendClient: {method} {url}"));

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if admin {
            request = request.header(ADMIN_KEY_HEADER, &self.admin_key);
        }

        let response = request.send().await.map_err(|err| {
            Error::BackendUnreachable(format!("failed to send {method} {url} request: {err}"))
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::BackendUnreachable(format!("failed to read {method} {url} response: {err}"))
        })?;
        let body = decode_body(&bytes);

        if status.is_success() {
            Ok(BackendResponse::new(&status.as_u16(), body))
        } else {
            rp_log::warn(
                None,
                format!("BackendClient: {method} {url} responded with {status}"),
            );
            Err(Error::BackendError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

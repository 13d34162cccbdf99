//! HTTP client for the updown.io REST API.
//!
//! [`Client::new_request`] and [`Client::send`] are the whole transport: every
//! resource service builds one request and sends it once.

use crate::alias::AliasResolver;
use crate::cache::{Cache, MemoryCache};
use crate::checks::CheckService;
use crate::downtimes::DowntimeService;
use crate::error::{ApiError, Error};
use crate::metrics::MetricService;
use crate::nodes::NodeService;
use crate::recipients::RecipientService;
use crate::webhooks::WebhookService;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const API_BASE: &str = "https://updown.io/api/";
const API_KEY_HEADER: &str = "X-API-KEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Pass as the body of [`Client::new_request`] when the request has none.
pub const NO_BODY: Option<&()> = None;

/// Status, final URL and headers of a completed response.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
}

/// A successful response together with its decoded body.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub info: ResponseInfo,
    pub data: T,
}

impl<T> Response<T> {
    pub fn status(&self) -> StatusCode {
        self.info.status
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            info: self.info,
            data: f(self.data),
        }
    }
}

/// updown.io API client.
///
/// Configuration is fixed at construction; clones share the same connection
/// pool and alias cache.
#[derive(Clone)]
pub struct Client {
    api_key: String,
    base_url: Url,
    user_agent: String,
    http: HttpClient,
    aliases: AliasResolver,
}

impl Client {
    /// Create a new client with the given API key and a default transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Like [`Client::new`], with a per-request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {e}")))?;
        Self::with_http_client(api_key, http)
    }

    /// Create a client around a caller-built `reqwest::Client`.
    pub fn with_http_client(api_key: impl Into<String>, http: HttpClient) -> Result<Self, Error> {
        let base_url = Url::parse(API_BASE).map_err(|source| Error::InvalidUrl {
            path: API_BASE.to_string(),
            source,
        })?;
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            user_agent: format!("updown-rs/{}", crate::VERSION),
            http,
            aliases: AliasResolver::new(Arc::new(MemoryCache::new())),
        })
    }

    /// Point the client at another endpoint. A trailing `/` is added so that
    /// relative paths resolve beneath it.
    pub fn with_base_url(mut self, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    /// Replace the alias cache.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.aliases = AliasResolver::new(cache);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        self.aliases.cache()
    }

    pub(crate) fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    pub fn checks(&self) -> CheckService<'_> {
        CheckService::new(self)
    }

    pub fn downtimes(&self) -> DowntimeService<'_> {
        DowntimeService::new(self)
    }

    pub fn metrics(&self) -> MetricService<'_> {
        MetricService::new(self)
    }

    pub fn nodes(&self) -> NodeService<'_> {
        NodeService::new(self)
    }

    pub fn recipients(&self) -> RecipientService<'_> {
        RecipientService::new(self)
    }

    pub fn webhooks(&self) -> WebhookService<'_> {
        WebhookService::new(self)
    }

    /// Build an authenticated request for `path` (relative to the base URL,
    /// query string allowed). A body, when given, is sent as JSON.
    pub fn new_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path).map_err(|source| Error::InvalidUrl {
            path: path.to_string(),
            source,
        })?;
        let mut req = self.http.request(method, url).headers(self.headers()?);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(Error::Encode)?;
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes);
        }
        req.build().map_err(|e| Error::Other(e.to_string()))
    }

    /// Execute `req` and decode a 2xx body into `T`.
    pub async fn send<T: DeserializeOwned>(&self, req: Request) -> Result<Response<T>, Error> {
        let (info, body) = self.dispatch(req).await?;
        match serde_json::from_slice(&body) {
            Ok(data) => Ok(Response { info, data }),
            Err(source) => Err(Error::Decode {
                source,
                response: info,
            }),
        }
    }

    /// Execute `req` without decoding the body.
    pub async fn execute(&self, req: Request) -> Result<ResponseInfo, Error> {
        self.dispatch(req).await.map(|(info, _)| info)
    }

    /// One round trip. Non-2xx responses become [`ApiError`].
    async fn dispatch(&self, req: Request) -> Result<(ResponseInfo, Vec<u8>), Error> {
        let method = req.method().clone();
        let url = req.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let transport = |source| Error::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };
        let res = self.http.execute(req).await.map_err(transport)?;
        let info = ResponseInfo {
            status: res.status(),
            url: res.url().clone(),
            headers: res.headers().clone(),
        };
        let body = res.bytes().await.map_err(transport)?.to_vec();
        tracing::debug!(%method, %url, status = info.status.as_u16(), "response received");

        if !info.status.is_success() {
            let data = serde_json::from_slice(&body).ok();
            let err = ApiError::new(method, url, info, data);
            tracing::warn!(error = %err, "request rejected");
            return Err(Error::Api(err));
        }
        Ok((info, body))
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        let mut key =
            HeaderValue::from_str(&self.api_key).map_err(|_| Error::InvalidCredential)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).map_err(|e| Error::Other(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::with_http_client("secret", HttpClient::new()).unwrap()
    }

    #[test]
    fn request_resolves_path_and_query_against_base() {
        let req = client()
            .new_request(Method::GET, "checks/s7su/downtimes?page=2", NO_BODY)
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://updown.io/api/checks/s7su/downtimes?page=2"
        );
        assert_eq!(req.method(), &Method::GET);
        assert!(req.body().is_none());
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn request_carries_credential_on_every_call() {
        let c = client();
        for path in ["checks", "nodes/ipv4", "recipients"] {
            let req = c.new_request(Method::GET, path, NO_BODY).unwrap();
            assert_eq!(req.headers().get(API_KEY_HEADER).unwrap(), "secret");
            assert_eq!(req.headers().get(ACCEPT).unwrap(), "application/json");
        }
    }

    #[test]
    fn request_body_is_json() {
        let body = serde_json::json!({"url": "https://example.com"});
        let req = client()
            .new_request(Method::POST, "checks", Some(&body))
            .unwrap();
        assert_eq!(
            req.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let sent: serde_json::Value =
            serde_json::from_slice(req.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn invalid_path_is_rejected() {
        let err = client()
            .new_request(Method::GET, "http://[::1", NO_BODY)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn unserializable_body_is_rejected() {
        let mut body = std::collections::HashMap::new();
        body.insert(vec![1u8], "value");
        let err = client()
            .new_request(Method::POST, "checks", Some(&body))
            .unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }

    #[test]
    fn credential_must_fit_in_a_header() {
        let c = Client::with_http_client("bad\nkey", HttpClient::new()).unwrap();
        let err = c.new_request(Method::GET, "checks", NO_BODY).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let c = client().with_base_url(Url::parse("http://127.0.0.1:9000/api").unwrap());
        let req = c.new_request(Method::GET, "nodes", NO_BODY).unwrap();
        assert_eq!(req.url().as_str(), "http://127.0.0.1:9000/api/nodes");
    }

    #[test]
    fn default_base_url_is_the_public_api() {
        assert_eq!(client().base_url().as_str(), API_BASE);
    }

    #[test]
    fn debug_hides_api_key() {
        let out = format!("{:?}", client());
        assert!(!out.contains("secret"));
    }
}

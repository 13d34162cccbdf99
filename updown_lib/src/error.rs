//! Error types for the updown.io API client.

use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::client::ResponseInfo;

/// Base error type for updown.io operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The relative path could not be resolved against the base URL.
    #[error("invalid request path {path:?}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("API key contains characters that are not allowed in an HTTP header")]
    InvalidCredential,

    /// Connection, DNS or timeout failure. No response is available.
    #[error("{method} {url}: {source}")]
    Transport {
        method: Method,
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A 2xx response whose body is not the expected JSON.
    #[error("failed to decode response from {}: {source}", .response.url)]
    Decode {
        #[source]
        source: serde_json::Error,
        response: ResponseInfo,
    },

    /// No listed resource carries the requested alias.
    #[error("Could not determine a token for the given name")]
    TokenNotFound,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Response information, when the request got as far as a response.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            Error::Api(e) => Some(&e.response),
            Error::Decode { response, .. } => Some(response),
            _ => None,
        }
    }

    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    pub fn is_token_not_found(&self) -> bool {
        matches!(self, Error::TokenNotFound)
    }
}

/// Raised when the API returns a non-2xx response.
///
/// Displays as `<METHOD> <URL>: <status-code> <status-text>`.
#[derive(Error, Debug)]
#[error("{method} {url}: {} {message}", .response.status.as_u16())]
pub struct ApiError {
    pub method: Method,
    pub url: Url,
    pub message: String,
    pub response: ResponseInfo,
    pub response_data: Option<serde_json::Value>,
}

impl ApiError {
    /// Builds the error from a rejected response. The status text is always
    /// the canonical reason phrase; see [`ApiError::service_message`] for the
    /// service's own explanation.
    pub fn new(
        method: Method,
        url: Url,
        response: ResponseInfo,
        response_data: Option<serde_json::Value>,
    ) -> Self {
        let message = response
            .status
            .canonical_reason()
            .unwrap_or_default()
            .to_string();
        Self {
            method,
            url,
            message,
            response,
            response_data,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.response.status.as_u16()
    }

    /// The `error` field of a JSON error body, if any.
    pub fn service_message(&self) -> Option<&str> {
        self.response_data.as_ref()?.get("error")?.as_str()
    }
}

//! Checks: the URLs updown.io monitors on a schedule.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::alias::Aliased;
use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

/// SSL section of a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ssl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A check performed by updown.io on a regular basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub down: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(rename = "apdex_t", default, skip_serializing_if = "Option::is_none")]
    pub apdex: Option<f64>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_check_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<Ssl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_until: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_locations: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_headers: BTreeMap<String, String>,
}

impl Aliased for Check {
    fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or_default()
    }

    fn token(&self) -> &str {
        &self.token
    }
}

/// Payload for creating or updating a check. Unset fields are left out of
/// the request so the service keeps its current (or default) value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    /// The URL to monitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Interval in seconds (15, 30, 60, 120, 300, 600, 1800 or 3600).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// APDEX threshold in seconds (0.125, 0.25, 0.5, 1.0, 2.0, 4.0 or 8.0).
    #[serde(rename = "apdex_t", skip_serializing_if = "Option::is_none")]
    pub apdex: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether the status page is public.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// Human readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Search for this string in the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_match: Option<String>,
    /// A time, `recovery` or `forever`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute_until: Option<String>,
    /// Abbreviated location names, e.g. `lan`, `mia`, `bhs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<BTreeMap<String, String>>,
}

impl CheckItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoveResponse {
    #[serde(default)]
    pub deleted: bool,
}

/// The checks section of the API.
pub struct CheckService<'a> {
    client: &'a Client,
}

impl<'a> CheckService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List all checks.
    pub async fn list(&self) -> Result<Response<Vec<Check>>, Error> {
        let req = self.client.new_request(Method::GET, "checks", NO_BODY)?;
        self.client.send(req).await
    }

    /// Get a single check by its token.
    pub async fn get(&self, token: &str) -> Result<Response<Check>, Error> {
        let req = self
            .client
            .new_request(Method::GET, &path_for_token(token), NO_BODY)?;
        self.client.send(req).await
    }

    /// Add a new check.
    pub async fn add(&self, data: &CheckItem) -> Result<Response<Check>, Error> {
        let req = self.client.new_request(Method::POST, "checks", Some(data))?;
        self.client.send(req).await
    }

    /// Update the check identified by `token`.
    pub async fn update(&self, token: &str, data: &CheckItem) -> Result<Response<Check>, Error> {
        let req = self
            .client
            .new_request(Method::PUT, &path_for_token(token), Some(data))?;
        self.client.send(req).await
    }

    /// Remove a check; the data is whether the service reports it deleted.
    pub async fn remove(&self, token: &str) -> Result<Response<bool>, Error> {
        let req = self
            .client
            .new_request(Method::DELETE, &path_for_token(token), NO_BODY)?;
        let res: Response<RemoveResponse> = self.client.send(req).await?;
        Ok(res.map(|r| r.deleted))
    }

    /// Find the token of the check named `name`, listing checks on a cache miss.
    ///
    /// Unnamed checks are cached under `""`, so an empty name is never looked
    /// up and always yields [`Error::TokenNotFound`].
    pub async fn token_for_alias(&self, name: &str) -> Result<String, Error> {
        if name.is_empty() {
            return Err(Error::TokenNotFound);
        }
        self.client
            .aliases()
            .token_for_alias(name, || async { self.list().await.map(Response::into_data) })
            .await
    }
}

pub(crate) fn path_for_token(token: &str) -> String {
    format!("checks/{}", urlencoding::encode(token))
}

//! Metrics: apdex, request counts and timings for a check.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::checks::path_for_token;
use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

/// How metrics are bucketed in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricGroup {
    /// One entry per hour.
    #[default]
    Time,
    /// One entry per monitoring location.
    Host,
}

impl MetricGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricGroup::Time => "time",
            MetricGroup::Host => "host",
        }
    }
}

impl std::str::FromStr for MetricGroup {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(MetricGroup::Time),
            "host" => Ok(MetricGroup::Host),
            _ => Err(format!("unknown metric group: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseTime {
    #[serde(default)]
    pub under125: u64,
    #[serde(default)]
    pub under250: u64,
    #[serde(default)]
    pub under500: u64,
    #[serde(default)]
    pub under1000: u64,
    #[serde(default)]
    pub under2000: u64,
    #[serde(default)]
    pub under4000: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requests {
    #[serde(default)]
    pub samples: u64,
    #[serde(default)]
    pub failures: u64,
    #[serde(default)]
    pub satisfied: u64,
    #[serde(default)]
    pub tolerated: u64,
    #[serde(rename = "by_response_time", default)]
    pub response_time: ResponseTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Timings in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default)]
    pub redirect: u64,
    #[serde(rename = "namelookup", default)]
    pub name_lookup: u64,
    #[serde(default)]
    pub connection: u64,
    #[serde(default)]
    pub handshake: u64,
    #[serde(default)]
    pub response: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    #[serde(default)]
    pub apdex: f64,
    #[serde(default)]
    pub requests: Requests,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,
}

/// Metrics keyed by group value (an hour timestamp or a location code).
pub type Metrics = BTreeMap<String, MetricItem>;

/// The metrics section of the API.
pub struct MetricService<'a> {
    client: &'a Client,
}

impl<'a> MetricService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Metrics for a check, optionally bounded by `from` / `to` (any time
    /// format the service accepts, e.g. ISO 8601).
    pub async fn list(
        &self,
        token: &str,
        group: MetricGroup,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Response<Metrics>, Error> {
        let req = self
            .client
            .new_request(Method::GET, &metrics_path(token, group, from, to), NO_BODY)?;
        self.client.send(req).await
    }
}

fn metrics_path(token: &str, group: MetricGroup, from: Option<&str>, to: Option<&str>) -> String {
    let mut path = format!("{}/metrics?group={}", path_for_token(token), group.as_str());
    if let Some(f) = from.filter(|f| !f.is_empty()) {
        path.push_str(&format!("&from={}", urlencoding::encode(f)));
    }
    if let Some(t) = to.filter(|t| !t.is_empty()) {
        path.push_str(&format!("&to={}", urlencoding::encode(t)));
    }
    path
}

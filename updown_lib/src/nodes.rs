//! Nodes: the monitoring locations performing checks.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Nodes keyed by location code (`lan`, `mia`, `bhs`, ...).
pub type Nodes = BTreeMap<String, NodeDetails>;

/// The nodes section of the API.
pub struct NodeService<'a> {
    client: &'a Client,
}

impl<'a> NodeService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Response<Nodes>, Error> {
        let req = self.client.new_request(Method::GET, "nodes", NO_BODY)?;
        self.client.send(req).await
    }

    /// IPv4 addresses the checks are sent from.
    pub async fn list_ipv4(&self) -> Result<Response<Vec<String>>, Error> {
        self.ip_list("4").await
    }

    /// IPv6 addresses the checks are sent from.
    pub async fn list_ipv6(&self) -> Result<Response<Vec<String>>, Error> {
        self.ip_list("6").await
    }

    async fn ip_list(&self, version: &str) -> Result<Response<Vec<String>>, Error> {
        let req = self
            .client
            .new_request(Method::GET, &format!("nodes/ipv{}", version), NO_BODY)?;
        self.client.send(req).await
    }
}

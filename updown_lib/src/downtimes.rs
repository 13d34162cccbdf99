//! Downtimes: periods during which a check was failing.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::checks::path_for_token;
use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

/// A downtime period for a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Downtime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// `None` while the check is still down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub partial: bool,
}

/// The downtimes section of the API.
pub struct DowntimeService<'a> {
    client: &'a Client,
}

impl<'a> DowntimeService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List one page of downtimes for a check. Pages start at 1; lower values
    /// ask for the first page.
    pub async fn list(&self, token: &str, page: u32) -> Result<Response<Vec<Downtime>>, Error> {
        let req = self
            .client
            .new_request(Method::GET, &downtimes_path(token, page), NO_BODY)?;
        self.client.send(req).await
    }
}

fn downtimes_path(token: &str, page: u32) -> String {
    format!("{}/downtimes?page={}", path_for_token(token), page.max(1))
}

//! Webhooks. The service has deprecated these in favour of recipients of
//! type `webhook`; they remain available for existing accounts.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::checks::RemoveResponse;
use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub url: String,
}

/// The webhooks section of the API.
pub struct WebhookService<'a> {
    client: &'a Client,
}

impl<'a> WebhookService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Response<Vec<Webhook>>, Error> {
        let req = self.client.new_request(Method::GET, "webhooks", NO_BODY)?;
        self.client.send(req).await
    }

    pub async fn add(&self, webhook: &Webhook) -> Result<Response<Webhook>, Error> {
        let req = self
            .client
            .new_request(Method::POST, "webhooks", Some(webhook))?;
        self.client.send(req).await
    }

    pub async fn remove(&self, id: &str) -> Result<Response<bool>, Error> {
        let path = format!("webhooks/{}", urlencoding::encode(id));
        let req = self.client.new_request(Method::DELETE, &path, NO_BODY)?;
        let res: Response<RemoveResponse> = self.client.send(req).await?;
        Ok(res.map(|r| r.deleted))
    }
}

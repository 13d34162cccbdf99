//! Recipients: the addresses notified when a check goes down or recovers.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::checks::RemoveResponse;
use crate::client::{Client, Response, NO_BODY};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    #[default]
    Email,
    Sms,
    Telegram,
    Webhook,
    Zapier,
    /// A type this client does not know about yet.
    #[serde(other)]
    Other,
}

impl std::str::FromStr for RecipientType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(RecipientType::Email),
            "sms" => Ok(RecipientType::Sms),
            "telegram" => Ok(RecipientType::Telegram),
            "webhook" => Ok(RecipientType::Webhook),
            "zapier" => Ok(RecipientType::Zapier),
            _ => Err(format!("unknown recipient type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    /// Assigned by the service; leave empty when adding.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: RecipientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Address, phone number or URL, depending on the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub immutable: bool,
}

impl Recipient {
    pub fn new(kind: RecipientType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// The recipients section of the API.
pub struct RecipientService<'a> {
    client: &'a Client,
}

impl<'a> RecipientService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Response<Vec<Recipient>>, Error> {
        let req = self.client.new_request(Method::GET, "recipients", NO_BODY)?;
        self.client.send(req).await
    }

    /// Add a recipient; the data is the recipient as stored, with its id.
    pub async fn add(&self, recipient: &Recipient) -> Result<Response<Recipient>, Error> {
        let req = self
            .client
            .new_request(Method::POST, "recipients", Some(recipient))?;
        self.client.send(req).await
    }

    pub async fn remove(&self, id: &str) -> Result<Response<bool>, Error> {
        let path = format!("recipients/{}", urlencoding::encode(id));
        let req = self.client.new_request(Method::DELETE, &path, NO_BODY)?;
        let res: Response<RemoveResponse> = self.client.send(req).await?;
        Ok(res.map(|r| r.deleted))
    }
}

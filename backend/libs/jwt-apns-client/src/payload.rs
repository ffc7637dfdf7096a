//! APNs payload assembly
//!
//! Only fields that are set are serialized; absent fields never appear as
//! `null`. Everything is wrapped in a single top-level `aps` object.

use serde::Serialize;

use crate::errors::ApnsError;

/// A structured APNs alert
///
/// Field names go on the wire with underscores mapped to hyphens
/// (`title_loc_key` becomes `title-loc-key`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Alert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Localizable string key for the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_loc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_loc_args: Option<Vec<String>>,
    /// Localized title of the View button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_loc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_args: Option<Vec<String>>,
    /// Image in the app bundle shown as launch image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_image: Option<String>,
}

impl Alert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn title_loc_key(mut self, key: impl Into<String>) -> Self {
        self.title_loc_key = Some(key.into());
        self
    }

    pub fn title_loc_args(mut self, args: Vec<String>) -> Self {
        self.title_loc_args = Some(args);
        self
    }

    pub fn action_loc_key(mut self, key: impl Into<String>) -> Self {
        self.action_loc_key = Some(key.into());
        self
    }

    pub fn loc_key(mut self, key: impl Into<String>) -> Self {
        self.loc_key = Some(key.into());
        self
    }

    pub fn loc_args(mut self, args: Vec<String>) -> Self {
        self.loc_args = Some(args);
        self
    }

    pub fn launch_image(mut self, image: impl Into<String>) -> Self {
        self.launch_image = Some(image.into());
        self
    }

    /// The alert as a JSON object containing only the fields that are set
    pub fn to_payload(&self) -> Result<serde_json::Value, ApnsError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Value of the `alert` key: either plain text or a structured alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AlertBody {
    PlainText(String),
    Alert(Alert),
}

impl From<&str> for AlertBody {
    fn from(text: &str) -> Self {
        AlertBody::PlainText(text.to_string())
    }
}

impl From<String> for AlertBody {
    fn from(text: String) -> Self {
        AlertBody::PlainText(text)
    }
}

impl From<Alert> for AlertBody {
    fn from(alert: Alert) -> Self {
        AlertBody::Alert(alert)
    }
}

/// The `aps` dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// 1 marks a silent (background) notification
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "thread-id", skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
}

#[derive(Serialize)]
struct Payload<'a> {
    aps: &'a Aps,
}

/// Encode the `aps` dictionary as the UTF-8 JSON request body
pub fn build_payload(aps: &Aps) -> Result<Vec<u8>, ApnsError> {
    Ok(serde_json::to_vec(&Payload { aps })?)
}

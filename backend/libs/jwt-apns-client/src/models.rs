use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_API_PORT;
use crate::payload::{AlertBody, Aps};
use crate::reasons::ApnsReason;

/// APNs Notification Priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Send immediately
    #[default]
    Immediate,
    /// Send at a time that takes device power into account
    PowerConsiderate,
    /// Prioritize device power; delivery may be grouped and throttled
    Low,
    /// Any other value APNs accepts in `apns-priority`
    Custom(u8),
}

impl Priority {
    pub fn as_u8(&self) -> u8 {
        match self {
            Priority::Immediate => 10,
            Priority::PowerConsiderate => 5,
            Priority::Low => 1,
            Priority::Custom(value) => *value,
        }
    }
}

/// One notification for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub device_registration_id: String,
    pub aps: Aps,
    pub priority: Priority,
    /// Unix timestamp after which APNs stops retrying; 0 means deliver once
    pub expiration: u64,
    /// Overrides the configured topic
    pub topic: Option<String>,
}

impl NotificationRequest {
    pub fn new(device_registration_id: impl Into<String>) -> Self {
        Self {
            device_registration_id: device_registration_id.into(),
            aps: Aps::default(),
            priority: Priority::default(),
            expiration: 0,
            topic: None,
        }
    }

    pub fn alert(mut self, alert: impl Into<AlertBody>) -> Self {
        self.aps.alert = Some(alert.into());
        self
    }

    pub fn badge(mut self, badge: u32) -> Self {
        self.aps.badge = Some(badge);
        self
    }

    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.aps.sound = Some(sound.into());
        self
    }

    pub fn content_available(mut self, flag: u8) -> Self {
        self.aps.content_available = Some(flag);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.aps.category = Some(category.into());
        self
    }

    pub fn thread(mut self, thread: impl Into<String>) -> Self {
        self.aps.thread = Some(thread.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn expiration(mut self, expiration: u64) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Result of sending one notification
///
/// A non-200 status is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// HTTP status code of the response
    pub status: u16,
    /// APNs reason string, empty on success
    pub reason: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    /// JSON payload that was sent
    pub payload: Option<Vec<u8>>,
    /// Request headers that were sent
    pub headers: Option<BTreeMap<String, String>>,
}

impl Default for NotificationResponse {
    fn default() -> Self {
        Self {
            status: 200,
            reason: String::new(),
            host: String::new(),
            port: DEFAULT_API_PORT,
            path: String::new(),
            payload: None,
            headers: None,
        }
    }
}

impl NotificationResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The reason as a known APNs reason, if it is one
    pub fn reason_kind(&self) -> Option<ApnsReason> {
        self.reason.parse().ok()
    }
}

/// Body APNs sends with a non-200 status
#[derive(Debug, Deserialize)]
pub(crate) struct ApnsErrorBody {
    #[serde(default)]
    pub reason: String,
}

/// JWT APNs Client Library
///
/// A small client for sending push notifications to Apple's Push Notification
/// service over HTTP/2, authenticated with a provider token (JWT) signed from
/// the team's `.p8` auth key.
///
/// It handles:
/// - Provider token signing (built once per client, never refreshed implicitly)
/// - `aps` payload assembly from plain-text or structured alerts
/// - A single lazily opened HTTP/2 connection, reset on `IdleTimeout`
/// - Reporting APNs status and reason strings back to the caller
///
/// A client may be shared between tasks; sends are issued one request at a
/// time per call and never retried.
pub mod client;
pub mod config;
pub mod connection;
pub mod errors;
pub mod models;
pub mod payload;
pub mod reasons;
pub mod token;

pub use client::{ApnsClient, DynPushProvider, PushProvider};
pub use config::{ApnsConfig, Environment};
pub use connection::{Connection, ConnectionManager};
pub use errors::ApnsError;
pub use models::{NotificationRequest, NotificationResponse, Priority};
pub use payload::{build_payload, Alert, AlertBody, Aps};
pub use reasons::ApnsReason;
pub use token::{build_token, ProviderClaims, TokenHeaders};

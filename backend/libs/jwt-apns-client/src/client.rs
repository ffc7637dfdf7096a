use std::collections::BTreeMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::ApnsConfig;
use crate::connection::{Connection, ConnectionManager};
use crate::errors::ApnsError;
use crate::models::{ApnsErrorBody, NotificationRequest, NotificationResponse, Priority};
use crate::payload::{build_payload, Aps};
use crate::reasons::ApnsReason;
use crate::token::{build_token, TokenHeaders};

/// Trait for push notification providers
#[async_trait::async_trait]
pub trait PushProvider: Send + Sync {
    /// Sends a push notification to a device
    ///
    /// # Returns
    /// The provider's response. Delivery failures reported by the provider are
    /// part of the response; `Err` is reserved for local and transport failures.
    async fn send(&self, request: &NotificationRequest)
        -> Result<NotificationResponse, ApnsError>;
}

pub type DynPushProvider = Box<dyn PushProvider>;

/// Apple Push Notification service client using JWT provider tokens
///
/// The provider token is built once at construction. APNs rejects providers
/// that rotate tokens too often, so it is never refreshed implicitly; call
/// [`ApnsClient::regenerate_provider_token`] when it needs replacing.
///
/// The client keeps a single HTTP/2 connection, opened on first use and
/// reused until APNs reports `IdleTimeout` or [`ApnsClient::close`] is called.
pub struct ApnsClient {
    config: ApnsConfig,
    secret: Zeroizing<String>,
    provider_token: Option<String>,
    connections: Mutex<ConnectionManager>,
}

impl ApnsClient {
    /// Creates a new APNs client
    ///
    /// Resolves the private key (inline key material or key path) and builds the
    /// provider token when both key id and team id are known and no token was
    /// supplied.
    pub fn new(config: ApnsConfig) -> Result<Self, ApnsError> {
        let secret = config.load_secret()?;
        let connections = ConnectionManager::new(
            config.resolved_host(),
            config.api_port,
            config.use_tls,
        );

        let mut client = Self {
            provider_token: config.provider_token.clone().filter(|t| !t.is_empty()),
            config,
            secret,
            connections: Mutex::new(connections),
        };

        if client.provider_token.is_none()
            && client.config.key_id.is_some()
            && client.config.team_id.is_some()
        {
            client.provider_token = Some(client.make_provider_token(None, None, None, None, None)?);
        }

        info!(
            environment = %client.config.environment,
            host = %client.config.resolved_host(),
            port = client.config.api_port,
            key_id = ?client.config.key_id,
            has_provider_token = client.provider_token.is_some(),
            "Initialized APNs client"
        );

        Ok(client)
    }

    pub fn config(&self) -> &ApnsConfig {
        &self.config
    }

    pub fn provider_token(&self) -> Option<&str> {
        self.provider_token.as_deref()
    }

    /// Build the `alg`/`kid` headers for a provider token
    pub fn token_headers(&self, algorithm: Option<&str>, key_id: Option<&str>) -> TokenHeaders {
        TokenHeaders::new(
            algorithm.unwrap_or(&self.config.algorithm),
            key_id
                .or(self.config.key_id.as_deref())
                .unwrap_or_default(),
        )
    }

    /// Build a provider token
    ///
    /// Every argument falls back to the client's own settings: `issuer` to the
    /// team id, `issued_at` to the current time, `algorithm` to the configured
    /// algorithm, `secret` to the loaded key and `headers` to
    /// [`ApnsClient::token_headers`] for the chosen algorithm.
    pub fn make_provider_token(
        &self,
        issuer: Option<&str>,
        issued_at: Option<i64>,
        algorithm: Option<&str>,
        secret: Option<&str>,
        headers: Option<&TokenHeaders>,
    ) -> Result<String, ApnsError> {
        let issuer = issuer
            .or(self.config.team_id.as_deref())
            .unwrap_or_default();
        let algorithm = algorithm.unwrap_or(&self.config.algorithm);
        let secret = secret.unwrap_or(self.secret.as_str());
        let headers = match headers {
            Some(headers) => headers.clone(),
            None => self.token_headers(Some(algorithm), None),
        };

        build_token(issuer, issued_at, secret, algorithm, &headers)
    }

    /// Replace the cached provider token with a freshly signed one
    pub fn regenerate_provider_token(&mut self) -> Result<&str, ApnsError> {
        let token = self.make_provider_token(None, None, None, None, None)?;
        info!(key_id = ?self.config.key_id, "Regenerated APNs provider token");
        Ok(self.provider_token.insert(token).as_str())
    }

    /// Build the request headers for one notification
    ///
    /// `apns-topic` is omitted when neither `topic` nor the configured topic
    /// is set.
    pub fn request_headers(
        &self,
        topic: Option<&str>,
        priority: Priority,
        expiration: u64,
    ) -> Result<BTreeMap<String, String>, ApnsError> {
        let token = self
            .provider_token
            .as_deref()
            .ok_or(ApnsError::MissingProviderToken)?;

        let mut headers = BTreeMap::new();
        headers.insert("apns-expiration".to_string(), expiration.to_string());
        headers.insert("apns-priority".to_string(), priority.as_u8().to_string());
        if let Some(topic) = topic.or(self.config.topic.as_deref()) {
            headers.insert("apns-topic".to_string(), topic.to_string());
        }
        headers.insert("authorization".to_string(), format!("bearer {token}"));

        Ok(headers)
    }

    /// Encode the request payload as UTF-8 JSON
    pub fn request_payload(&self, aps: &Aps) -> Result<Vec<u8>, ApnsError> {
        build_payload(aps)
    }

    pub fn request_path(&self, device_registration_id: &str) -> String {
        format!(
            "/{}/device/{}",
            self.config.api_version, device_registration_id
        )
    }

    /// Get the cached connection, opening one if needed
    pub async fn connection(&self) -> Result<Connection, ApnsError> {
        self.connections.lock().await.get_or_create()
    }

    pub async fn has_connection(&self) -> bool {
        self.connections.lock().await.is_open()
    }

    /// Close the HTTP/2 connection with an optional error code
    pub async fn close(&self, error_code: Option<u32>) {
        self.connections.lock().await.close(error_code);
    }

    /// Send a notification to one device
    ///
    /// Reuses the cached connection or opens a new one. If APNs answers
    /// `IdleTimeout` the connection is discarded so the next call reconnects;
    /// the notification itself is not resent.
    pub async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse, ApnsError> {
        let device_token_prefix = request
            .device_registration_id
            .chars()
            .take(8)
            .collect::<String>();

        let headers = self.request_headers(
            request.topic.as_deref(),
            request.priority,
            request.expiration,
        )?;
        let payload = self.request_payload(&request.aps)?;
        let path = self.request_path(&request.device_registration_id);

        let conn = self.connection().await?;
        debug!(
            token = %device_token_prefix,
            connection_id = conn.id(),
            payload_bytes = payload.len(),
            "Sending APNs notification"
        );

        let raw = conn.post(&path, payload.clone(), &headers).await?;

        let reason = if raw.status == 200 {
            String::new()
        } else {
            match serde_json::from_slice::<ApnsErrorBody>(&raw.body) {
                Ok(body) => body.reason,
                Err(e) => {
                    warn!(
                        status = raw.status,
                        error = %e,
                        "Unparsable APNs error body"
                    );
                    String::new()
                }
            }
        };

        if raw.status == 200 {
            debug!(token = %device_token_prefix, "APNs notification accepted");
        } else {
            warn!(
                token = %device_token_prefix,
                status = raw.status,
                reason = %reason,
                "APNs rejected notification"
            );
        }

        let response = NotificationResponse {
            status: raw.status,
            reason,
            host: conn.host().to_string(),
            port: conn.port(),
            path,
            payload: Some(payload),
            headers: Some(headers),
        };

        if response.reason == ApnsReason::IdleTimeout.as_str() {
            info!(
                connection_id = conn.id(),
                "APNs reported idle timeout, dropping connection"
            );
            self.connections.lock().await.close_if(conn.id(), None);
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl PushProvider for ApnsClient {
    async fn send(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse, ApnsError> {
        self.send_notification(request).await
    }
}

//! APNs Connection Manager
//!
//! Holds at most one live HTTP/2 connection handle to the configured APNs
//! host. The handle is created lazily on first use, reused across sends, and
//! dropped on [`ConnectionManager::close`].

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, info};

use crate::errors::ApnsError;

/// A live connection handle
///
/// Cloning shares the underlying transport.
#[derive(Clone, Debug)]
pub struct Connection {
    id: u64,
    host: String,
    port: u16,
    base_url: String,
    http: reqwest::Client,
}

/// Status and body of one APNs response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Connection {
    fn open(id: u64, host: &str, port: u16, use_tls: bool) -> Result<Self, ApnsError> {
        let builder = reqwest::Client::builder();
        let builder = if use_tls {
            builder
                .use_rustls_tls()
                .https_only(true)
                .http2_prior_knowledge()
        } else {
            builder
        };
        let http = builder.build()?;

        let scheme = if use_tls { "https" } else { "http" };
        let authority = if host.contains(':') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };

        Ok(Self {
            id,
            host: host.to_string(),
            port,
            base_url: format!("{scheme}://{authority}"),
            http,
        })
    }

    /// Identifier unique among the connections one manager has opened
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Issue one POST and read the full response body
    pub async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        headers: &BTreeMap<String, String>,
    ) -> Result<RawResponse, ApnsError> {
        let mut header_map = HeaderMap::with_capacity(headers.len() + 1);
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApnsError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApnsError::InvalidHeader(format!("{name}: {e}")))?;
            header_map.insert(name, value);
        }
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .headers(header_map)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

/// Lazily creates and caches a single connection
#[derive(Debug)]
pub struct ConnectionManager {
    host: String,
    port: u16,
    use_tls: bool,
    conn: Option<Connection>,
    opened: u64,
}

impl ConnectionManager {
    pub fn new(host: impl Into<String>, port: u16, use_tls: bool) -> Self {
        Self {
            host: host.into(),
            port,
            use_tls,
            conn: None,
            opened: 0,
        }
    }

    /// Return the cached connection, opening one if none is cached
    pub fn get_or_create(&mut self) -> Result<Connection, ApnsError> {
        if let Some(conn) = &self.conn {
            return Ok(conn.clone());
        }

        self.opened += 1;
        let conn = Connection::open(self.opened, &self.host, self.port, self.use_tls)?;
        info!(
            host = %self.host,
            port = self.port,
            connection_id = conn.id,
            "Opened APNs connection"
        );

        self.conn = Some(conn.clone());
        Ok(conn)
    }

    /// Close the cached connection, if any
    ///
    /// The transport is released once the last clone of the handle is
    /// dropped. `error_code` is recorded for diagnostics only.
    pub fn close(&mut self, error_code: Option<u32>) {
        if let Some(conn) = self.conn.take() {
            info!(
                host = %conn.host,
                port = conn.port,
                connection_id = conn.id,
                error_code = ?error_code,
                "Closed APNs connection"
            );
        } else {
            debug!("No APNs connection to close");
        }
    }

    /// Close the cached connection only if it is the one with `id`
    ///
    /// A reply that arrives on an older connection must not tear down a
    /// connection opened after it. Returns whether anything was closed.
    pub fn close_if(&mut self, id: u64, error_code: Option<u32>) -> bool {
        match self.conn.as_ref().map(|conn| conn.id) {
            Some(current) if current == id => {
                self.close(error_code);
                true
            }
            Some(current) => {
                debug!(
                    stale_id = id,
                    connection_id = current,
                    "Cached APNs connection already replaced"
                );
                false
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_is_created_lazily() {
        let manager = ConnectionManager::new("localhost", 8443, false);
        assert!(!manager.is_open());
    }

    #[test]
    fn test_get_or_create_reuses_handle() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);

        let first = manager.get_or_create().unwrap();
        let second = manager.get_or_create().unwrap();

        assert!(manager.is_open());
        assert_eq!(first.id(), second.id());
        assert_eq!(first.host(), "localhost");
        assert_eq!(first.port(), 8443);
    }

    #[test]
    fn test_close_clears_handle() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);

        let first = manager.get_or_create().unwrap();
        manager.close(None);
        assert!(!manager.is_open());

        let second = manager.get_or_create().unwrap();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_close_without_connection_is_noop() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);
        manager.close(Some(0));
        assert!(!manager.is_open());
    }

    #[test]
    fn test_close_if_matching_id() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);

        let conn = manager.get_or_create().unwrap();
        assert!(manager.close_if(conn.id(), None));
        assert!(!manager.is_open());
    }

    #[test]
    fn test_close_if_keeps_newer_connection() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);

        let stale = manager.get_or_create().unwrap();
        manager.close(None);
        let fresh = manager.get_or_create().unwrap();

        assert!(!manager.close_if(stale.id(), None));
        assert!(manager.is_open());
        assert_eq!(manager.get_or_create().unwrap().id(), fresh.id());
    }

    #[test]
    fn test_close_if_without_connection() {
        let mut manager = ConnectionManager::new("localhost", 8443, false);
        assert!(!manager.close_if(1, None));
    }

    #[test]
    fn test_ipv6_authority() {
        let conn = Connection::open(1, "::1", 443, false).unwrap();
        assert_eq!(conn.base_url, "http://[::1]:443");
    }
}

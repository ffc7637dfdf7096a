use std::path::PathBuf;

use thiserror::Error;

/// APNs Client Error Types
///
/// Non-200 APNs responses are not errors; they come back as a
/// [`crate::NotificationResponse`] carrying the reason string.
#[derive(Error, Debug)]
pub enum ApnsError {
    #[error("Failed to read APNs key file {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("APNs configuration error: {0}")]
    InvalidConfig(String),

    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("JWT algorithm {algorithm} does not match header alg {header}")]
    AlgorithmMismatch { algorithm: String, header: String },

    #[error("Failed to sign provider token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("No provider token available; set key id and team id or supply a token")]
    MissingProviderToken,

    #[error("Failed to encode payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("APNs transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
}

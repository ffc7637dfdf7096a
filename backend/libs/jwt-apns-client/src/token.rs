//! Provider token construction
//!
//! Signing is delegated to `jsonwebtoken`. Nothing here caches tokens: APNs
//! answers `TooManyProviderTokenUpdates` when a provider rotates too often, so
//! the client builds one token at construction and reuses it.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::errors::ApnsError;

/// Headers of the provider token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeaders {
    pub alg: String,
    pub kid: String,
}

impl TokenHeaders {
    pub fn new(alg: impl Into<String>, kid: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            kid: kid.into(),
        }
    }
}

/// JWT Claims for APNs provider authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderClaims {
    pub iss: String,
    pub iat: i64,
}

/// Build a signed provider token
///
/// # Arguments
/// * `issuer` - JWT issuer, normally the team id
/// * `issued_at` - Unix timestamp; defaults to now
/// * `secret` - Key material (PEM for ES/RS/PS/EdDSA, raw bytes for HS)
/// * `algorithm` - Algorithm name, must equal `headers.alg`
/// * `headers` - `alg` and `kid` token headers
pub fn build_token(
    issuer: &str,
    issued_at: Option<i64>,
    secret: &str,
    algorithm: &str,
    headers: &TokenHeaders,
) -> Result<String, ApnsError> {
    if algorithm != headers.alg {
        return Err(ApnsError::AlgorithmMismatch {
            algorithm: algorithm.to_string(),
            header: headers.alg.clone(),
        });
    }

    let alg = parse_algorithm(algorithm)?;
    let key = encoding_key(alg, secret)?;

    let mut header = Header::new(alg);
    header.kid = Some(headers.kid.clone());

    let claims = ProviderClaims {
        iss: issuer.to_string(),
        iat: issued_at.unwrap_or_else(|| Utc::now().timestamp()),
    };

    Ok(encode(&header, &claims, &key)?)
}

fn parse_algorithm(name: &str) -> Result<Algorithm, ApnsError> {
    name.parse::<Algorithm>()
        .map_err(|_| ApnsError::UnsupportedAlgorithm(name.to_string()))
}

fn encoding_key(alg: Algorithm, secret: &str) -> Result<EncodingKey, ApnsError> {
    let bytes = secret.as_bytes();
    let key = match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => EncodingKey::from_secret(bytes),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(bytes)?,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => EncodingKey::from_rsa_pem(bytes)?,
        Algorithm::EdDSA => EncodingKey::from_ed_pem(bytes)?,
    };
    Ok(key)
}

use std::fmt;
use std::str::FromStr;

/// Reason strings APNs returns in error response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApnsReason {
    // 400
    BadCollapseId,
    BadDeviceToken,
    BadExpirationDate,
    BadMessageId,
    BadPriority,
    BadTopic,
    DeviceTokenNotForTopic,
    DuplicateHeaders,
    IdleTimeout,
    MissingDeviceToken,
    MissingTopic,
    PayloadEmpty,
    TopicDisallowed,

    // 403
    BadCertificate,
    BadCertificateEnvironment,
    ExpiredProviderToken,
    Forbidden,
    InvalidProviderToken,
    MissingProviderToken,

    // 404
    BadPath,

    // 405
    MethodNotAllowed,

    // 410
    Unregistered,

    // 413
    PayloadTooLarge,

    // 429
    TooManyProviderTokenUpdates,
    TooManyRequests,

    // 500
    InternalServerError,

    // 502
    ServiceUnavailable,

    // 503
    Shutdown,
}

impl ApnsReason {
    pub const ALL: [ApnsReason; 28] = [
        ApnsReason::BadCollapseId,
        ApnsReason::BadDeviceToken,
        ApnsReason::BadExpirationDate,
        ApnsReason::BadMessageId,
        ApnsReason::BadPriority,
        ApnsReason::BadTopic,
        ApnsReason::DeviceTokenNotForTopic,
        ApnsReason::DuplicateHeaders,
        ApnsReason::IdleTimeout,
        ApnsReason::MissingDeviceToken,
        ApnsReason::MissingTopic,
        ApnsReason::PayloadEmpty,
        ApnsReason::TopicDisallowed,
        ApnsReason::BadCertificate,
        ApnsReason::BadCertificateEnvironment,
        ApnsReason::ExpiredProviderToken,
        ApnsReason::Forbidden,
        ApnsReason::InvalidProviderToken,
        ApnsReason::MissingProviderToken,
        ApnsReason::BadPath,
        ApnsReason::MethodNotAllowed,
        ApnsReason::Unregistered,
        ApnsReason::PayloadTooLarge,
        ApnsReason::TooManyProviderTokenUpdates,
        ApnsReason::TooManyRequests,
        ApnsReason::InternalServerError,
        ApnsReason::ServiceUnavailable,
        ApnsReason::Shutdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApnsReason::BadCollapseId => "BadCollapseId",
            ApnsReason::BadDeviceToken => "BadDeviceToken",
            ApnsReason::BadExpirationDate => "BadExpirationDate",
            ApnsReason::BadMessageId => "BadMessageId",
            ApnsReason::BadPriority => "BadPriority",
            ApnsReason::BadTopic => "BadTopic",
            ApnsReason::DeviceTokenNotForTopic => "DeviceTokenNotForTopic",
            ApnsReason::DuplicateHeaders => "DuplicateHeaders",
            ApnsReason::IdleTimeout => "IdleTimeout",
            ApnsReason::MissingDeviceToken => "MissingDeviceToken",
            ApnsReason::MissingTopic => "MissingTopic",
            ApnsReason::PayloadEmpty => "PayloadEmpty",
            ApnsReason::TopicDisallowed => "TopicDisallowed",
            ApnsReason::BadCertificate => "BadCertificate",
            ApnsReason::BadCertificateEnvironment => "BadCertificateEnvironment",
            ApnsReason::ExpiredProviderToken => "ExpiredProviderToken",
            ApnsReason::Forbidden => "Forbidden",
            ApnsReason::InvalidProviderToken => "InvalidProviderToken",
            ApnsReason::MissingProviderToken => "MissingProviderToken",
            ApnsReason::BadPath => "BadPath",
            ApnsReason::MethodNotAllowed => "MethodNotAllowed",
            ApnsReason::Unregistered => "Unregistered",
            ApnsReason::PayloadTooLarge => "PayloadTooLarge",
            ApnsReason::TooManyProviderTokenUpdates => "TooManyProviderTokenUpdates",
            ApnsReason::TooManyRequests => "TooManyRequests",
            ApnsReason::InternalServerError => "InternalServerError",
            ApnsReason::ServiceUnavailable => "ServiceUnavailable",
            ApnsReason::Shutdown => "Shutdown",
        }
    }

    /// HTTP status APNs pairs with this reason
    pub fn status_code(&self) -> u16 {
        match self {
            ApnsReason::BadCollapseId
            | ApnsReason::BadDeviceToken
            | ApnsReason::BadExpirationDate
            | ApnsReason::BadMessageId
            | ApnsReason::BadPriority
            | ApnsReason::BadTopic
            | ApnsReason::DeviceTokenNotForTopic
            | ApnsReason::DuplicateHeaders
            | ApnsReason::IdleTimeout
            | ApnsReason::MissingDeviceToken
            | ApnsReason::MissingTopic
            | ApnsReason::PayloadEmpty
            | ApnsReason::TopicDisallowed => 400,
            ApnsReason::BadCertificate
            | ApnsReason::BadCertificateEnvironment
            | ApnsReason::ExpiredProviderToken
            | ApnsReason::Forbidden
            | ApnsReason::InvalidProviderToken
            | ApnsReason::MissingProviderToken => 403,
            ApnsReason::BadPath => 404,
            ApnsReason::MethodNotAllowed => 405,
            ApnsReason::Unregistered => 410,
            ApnsReason::PayloadTooLarge => 413,
            ApnsReason::TooManyProviderTokenUpdates | ApnsReason::TooManyRequests => 429,
            ApnsReason::InternalServerError => 500,
            ApnsReason::ServiceUnavailable => 502,
            ApnsReason::Shutdown => 503,
        }
    }
}

impl fmt::Display for ApnsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApnsReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApnsReason::ALL
            .iter()
            .copied()
            .find(|reason| reason.as_str() == s)
            .ok_or_else(|| format!("unknown APNs reason: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_round_trips_through_str() {
        for reason in ApnsReason::ALL {
            assert_eq!(reason.as_str().parse::<ApnsReason>().unwrap(), reason);
        }
    }

    #[test]
    fn test_idle_timeout_string() {
        assert_eq!(ApnsReason::IdleTimeout.as_str(), "IdleTimeout");
        assert_eq!(ApnsReason::IdleTimeout.status_code(), 400);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApnsReason::ExpiredProviderToken.status_code(), 403);
        assert_eq!(ApnsReason::Unregistered.status_code(), 410);
        assert_eq!(ApnsReason::TooManyProviderTokenUpdates.status_code(), 429);
        assert_eq!(ApnsReason::ServiceUnavailable.status_code(), 502);
        assert_eq!(ApnsReason::Shutdown.status_code(), 503);
    }

    #[test]
    fn test_unknown_reason() {
        assert!("SomethingNew".parse::<ApnsReason>().is_err());
    }
}

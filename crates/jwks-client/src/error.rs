//! Errors for jwks-client

use thiserror::Error;

/// jwks-client Errors
///
/// Errors are `Clone` so that every caller waiting on the same in-flight
/// resolution receives the same settled value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Remote Errors
    // ============================================================================
    /// Transport failure, non-2xx status or malformed body
    #[error("{0}")]
    RemoteFetch(String),

    #[error("Remote response too large: {size} bytes (maximum: {max} bytes)")]
    RemoteResponseTooLarge { size: usize, max: usize },

    #[error("Remote JWK set too large: {key_count} keys (maximum: {max} keys)")]
    RemoteJwkSetTooLarge { key_count: usize, max: usize },

    // ============================================================================
    // Key Set Errors
    // ============================================================================
    #[error("The JWKS endpoint did not contain any keys")]
    EmptyKeySet,

    #[error("The JWKS endpoint did not contain any signing keys")]
    NoSigningKeys,

    #[error("Unable to find a signing key that matches '{kid}'")]
    SigningKeyNotFound { kid: String },

    // ============================================================================
    // Admission Errors
    // ============================================================================
    #[error("Too many requests to the JWKS endpoint (quota: {quota} per minute)")]
    RateLimitExceeded { quota: u32 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Stable classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RemoteFetch,
    EmptyKeySet,
    NoSigningKeys,
    SigningKeyNotFound,
    RateLimitExceeded,
    InvalidConfiguration,
}

impl ErrorKind {
    /// Stable name for logs and adapter layers
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::RemoteFetch => "RemoteFetchError",
            ErrorKind::EmptyKeySet => "EmptyKeySetError",
            ErrorKind::NoSigningKeys => "NoSigningKeysError",
            ErrorKind::SigningKeyNotFound => "SigningKeyNotFoundError",
            ErrorKind::RateLimitExceeded => "RateLimitExceededError",
            ErrorKind::InvalidConfiguration => "InvalidConfigurationError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RemoteFetch(_)
            | Error::RemoteResponseTooLarge { .. }
            | Error::RemoteJwkSetTooLarge { .. } => ErrorKind::RemoteFetch,
            Error::EmptyKeySet => ErrorKind::EmptyKeySet,
            Error::NoSigningKeys => ErrorKind::NoSigningKeys,
            Error::SigningKeyNotFound { .. } => ErrorKind::SigningKeyNotFound,
            Error::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            Error::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
        }
    }
}

/// Result type alias for jwks-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure converting one JWK into a signing key
///
/// Never surfaces to callers: the offending entry is dropped from the key set.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("jwks: {0}")]
pub(crate) struct ConversionError(pub(crate) String);

impl ConversionError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

//! URL validation utilities
//!
//! The JWKS URI is checked once, when the client is constructed, so that a
//! malformed or oversized endpoint never reaches the HTTP layer.

use crate::error::{Error, Result};
use crate::limits::MAX_JWKS_URI_LENGTH;

/// Validate JWKS URI format and size
pub(crate) fn validate_jwks_uri(uri: &str) -> Result<url::Url> {
    if uri.trim().is_empty() {
        return Err(Error::InvalidConfiguration(
            "JWKS URI cannot be empty".into(),
        ));
    }

    if uri.len() > MAX_JWKS_URI_LENGTH {
        return Err(Error::InvalidConfiguration(format!(
            "JWKS URI too long: {} characters (maximum: {MAX_JWKS_URI_LENGTH} characters)",
            uri.len()
        )));
    }

    let parsed = uri
        .parse::<url::Url>()
        .map_err(|e| Error::InvalidConfiguration(format!("invalid JWKS URI: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::InvalidConfiguration(
            "JWKS URI must use http or https scheme".into(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(Error::InvalidConfiguration(
            "JWKS URI must have a valid host".into(),
        ));
    }

    Ok(parsed)
}

//! Signing keys extracted from a key set

use crate::error::{Error, Result};
use crate::jwks::jwk::Jwk;
use std::fmt;
use tracing::debug;

/// A signing key resolved from the JWKS endpoint
///
/// Key material is PEM text: a `PUBLIC KEY` (SubjectPublicKeyInfo) or
/// `CERTIFICATE` block for the public half, and an `EC PRIVATE KEY` or
/// `RSA PRIVATE KEY` block when the endpoint published private components.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    kid: String,
    algorithm: Option<String>,
    public_key: String,
    private_key: Option<String>,
}

impl SigningKey {
    pub(crate) fn new(
        kid: String,
        algorithm: Option<String>,
        public_key: String,
        private_key: Option<String>,
    ) -> Self {
        Self {
            kid,
            algorithm,
            public_key,
            private_key,
        }
    }

    /// Key ID
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Advisory `alg` of the source entry, if any
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// PEM-encoded public key or certificate
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// PEM-encoded private key
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    /// Whether the source entry carried private key material
    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Filter a raw key set down to its signing keys and convert each one
///
/// Entries that are not signature keys, or that lack the material needed for
/// conversion, are skipped. So are entries whose conversion fails.
///
/// # Errors
///
/// - [`Error::EmptyKeySet`] if `keys` is empty
/// - [`Error::NoSigningKeys`] if no entry survives filtering and conversion
pub fn extract_signing_keys(keys: &[Jwk]) -> Result<Vec<SigningKey>> {
    if keys.is_empty() {
        return Err(Error::EmptyKeySet);
    }

    let signing_keys: Vec<SigningKey> = keys
        .iter()
        .filter(|jwk| jwk.is_signing_key())
        .filter_map(|jwk| match jwk.to_signing_key() {
            Ok(key) => Some(key),
            Err(e) => {
                debug!(kid = ?jwk.kid, error = %e, "skipping key that failed conversion");
                None
            }
        })
        .collect();

    if signing_keys.is_empty() {
        return Err(Error::NoSigningKeys);
    }

    debug!(
        kids = ?signing_keys.iter().map(SigningKey::kid).collect::<Vec<_>>(),
        "extracted signing keys"
    );

    Ok(signing_keys)
}

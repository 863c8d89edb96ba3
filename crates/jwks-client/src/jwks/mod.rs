//! JSON Web Key Set (JWKS) module
pub(crate) mod jwk;
pub(crate) mod signing_key;

use crate::error::{Error, Result};
use crate::jwks::jwk::Jwk;
use crate::limits::{MAX_JWK_SET_SIZE, MAX_JWKS_RESPONSE_SIZE};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Fetches the raw key set from one JWKS URI
///
/// Every call is one network round trip. Nothing is retried.
#[derive(Debug, Clone)]
pub(crate) struct KeySetFetcher {
    client: reqwest::Client,
    jwks_uri: Url,
}

impl KeySetFetcher {
    pub(crate) fn new(client: reqwest::Client, jwks_uri: Url) -> Self {
        Self { client, jwks_uri }
    }

    pub(crate) fn jwks_uri(&self) -> &Url {
        &self.jwks_uri
    }

    /// Fetch and normalize the key set
    pub(crate) async fn fetch(&self) -> Result<Vec<Jwk>> {
        debug!(uri = %self.jwks_uri, "fetching keys");

        let mut response = self
            .client
            .get(self.jwks_uri.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| {
                warn!(uri = %self.jwks_uri, error = %e, "failure fetching keys");
                Error::RemoteFetch(format!("network: {e}"))
            })?;

        // Reject early on the advertised length, then again while streaming
        if let Some(length) = response.content_length() {
            let size = usize::try_from(length).unwrap_or(usize::MAX);
            if size > MAX_JWKS_RESPONSE_SIZE {
                return Err(Error::RemoteResponseTooLarge {
                    size,
                    max: MAX_JWKS_RESPONSE_SIZE,
                });
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::RemoteFetch(format!("network: {e}")))?
        {
            if bytes.len() + chunk.len() > MAX_JWKS_RESPONSE_SIZE {
                return Err(Error::RemoteResponseTooLarge {
                    size: bytes.len() + chunk.len(),
                    max: MAX_JWKS_RESPONSE_SIZE,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        let status = response.status();
        if !status.is_success() {
            let message = http_error_message(status, &bytes);
            warn!(uri = %self.jwks_uri, status = status.as_u16(), %message, "failure fetching keys");
            return Err(Error::RemoteFetch(message));
        }

        let keys = parse_key_set(&bytes)?;
        debug!(count = keys.len(), "keys fetched");
        Ok(keys)
    }
}

/// Message for a non-2xx response
///
/// Prefers a JSON `message` member, then the body text, then the status
/// reason phrase.
fn http_error_message(status: StatusCode, body: &[u8]) -> String {
    let from_json = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .filter(|m| !m.is_empty());
    if let Some(message) = from_json {
        return message;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("Http Error {}", status.as_u16()),
    }
}

/// Normalize a JWKS body into a sequence of entries
///
/// Accepts the `{"keys": [...]}` envelope, a bare array of keys or a single
/// key object. `null` and a null `keys` member are empty sets. Entries that
/// do not deserialize as a JWK are dropped, the rest of the set is kept.
fn parse_key_set(bytes: &[u8]) -> Result<Vec<Jwk>> {
    let invalid = || Error::RemoteFetch("jwks: invalid jwks json".to_string());

    let body: Value = serde_json::from_slice(bytes).map_err(|_| invalid())?;
    let entries = match body {
        Value::Null => Vec::new(),
        Value::Object(mut object) => match object.remove("keys") {
            Some(Value::Null) => Vec::new(),
            Some(Value::Array(keys)) => keys,
            Some(_) => return Err(invalid()),
            None => vec![Value::Object(object)],
        },
        Value::Array(keys) => keys,
        _ => return Err(invalid()),
    };

    if entries.len() > MAX_JWK_SET_SIZE {
        return Err(Error::RemoteJwkSetTooLarge {
            key_count: entries.len(),
            max: MAX_JWK_SET_SIZE,
        });
    }

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Jwk>(entry) {
            Ok(jwk) => Some(jwk),
            Err(e) => {
                debug!(index, error = %e, "dropping malformed JWKS entry");
                None
            }
        })
        .collect())
}

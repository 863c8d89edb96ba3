//! Base64 decoding for JWK fields
//!
//! JWK coordinates are Base64URL without padding (RFC 7518), while `x5c`
//! certificates use standard Base64 with padding (RFC 7517 Section 4.7).
//! Both decoders enforce an upper bound on the encoded input.

use crate::error::ConversionError;
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

/// Decode a Base64URL JWK field, rejecting inputs longer than `max_encoded`
pub(crate) fn decode_field(
    field: &str,
    input: &str,
    max_encoded: usize,
) -> Result<Vec<u8>, ConversionError> {
    if input.len() > max_encoded {
        return Err(ConversionError::new(format!(
            "field '{field}' too large: {} bytes (maximum: {max_encoded} bytes)",
            input.len()
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| ConversionError::new(format!("failed to decode {field}: {e}")))?;

    if bytes.is_empty() {
        return Err(ConversionError::new(format!("field '{field}' is empty")));
    }

    Ok(bytes)
}

/// Decode a standard Base64 `x5c` certificate
pub(crate) fn decode_certificate(
    input: &str,
    max_encoded: usize,
) -> Result<Vec<u8>, ConversionError> {
    if input.len() > max_encoded {
        return Err(ConversionError::new(format!(
            "x5c certificate too large: {} bytes (maximum: {max_encoded} bytes)",
            input.len()
        )));
    }

    let bytes = STANDARD
        .decode(input)
        .map_err(|e| ConversionError::new(format!("failed to decode x5c: {e}")))?;

    if bytes.is_empty() {
        return Err(ConversionError::new("x5c certificate is empty"));
    }

    Ok(bytes)
}

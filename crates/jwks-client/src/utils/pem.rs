//! PEM armor for DER key structures

use pem::{EncodeConfig, LineEnding, Pem};

pub(crate) const PUBLIC_KEY: &str = "PUBLIC KEY";
pub(crate) const CERTIFICATE: &str = "CERTIFICATE";
pub(crate) const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
pub(crate) const EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";

/// Wrap DER bytes in a PEM block with `\n` line endings and 64-column lines
pub(crate) fn encode(tag: &str, der: Vec<u8>) -> String {
    pem::encode_config(
        &Pem::new(tag, der),
        EncodeConfig::new().set_line_ending(LineEnding::LF),
    )
}

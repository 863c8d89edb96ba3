//! JWK (JSON Web Key) struct and conversion

use crate::error::ConversionError;
use crate::jwks::signing_key::SigningKey;
use crate::limits::{
    MAX_JWK_ALG_SIZE, MAX_JWK_COORDINATE_SIZE, MAX_JWK_E_SIZE, MAX_JWK_KID_SIZE, MAX_JWK_N_SIZE,
    MAX_JWK_X5C_SIZE,
};
use crate::utils::base64url::{decode_certificate, decode_field};
use crate::utils::der::{
    EcCurve, RsaPrivateComponents, ec_private_key_der, ec_spki_from_xy, rsa_private_key_der,
    rsa_spki_from_n_e,
};
use crate::utils::pem;
use serde::{Deserialize, Serialize};

/// JSON Web Key (JWK) as published by the endpoint
///
/// Only the fields this crate interprets are typed. Everything else the
/// endpoint sends is kept in [`Jwk::other`], so a key set returned by
/// [`JwksClient::get_keys`](crate::JwksClient::get_keys) is the raw,
/// unvalidated collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jwk {
    /// Key type (e.g., "RSA", "EC")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Key use (RFC 7517 Section 4.2): "sig" or "enc"
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Key ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Algorithm (advisory field per RFC 7517)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    // EC fields
    /// Elliptic curve name (e.g., "P-256")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC x-coordinate (Base64URL-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// EC y-coordinate (Base64URL-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Private scalar (EC) or private exponent (RSA), Base64URL-encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    // RSA fields
    /// RSA modulus (Base64URL-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA exponent (Base64URL-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
    // X.509 fields
    /// Certificate chain, standard Base64 DER, leaf first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,
    /// Certificate SHA-1 thumbprint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,
    /// Any other member of the JWK object
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, ConversionError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConversionError::new(format!("missing {name}")))
}

impl Jwk {
    /// Whether this entry is a signature key carrying the material needed
    /// for conversion: `use` is "sig", `kid` is non-empty, and it has either
    /// a certificate chain, EC coordinates or an RSA modulus and exponent.
    pub fn is_signing_key(&self) -> bool {
        self.key_use.as_deref() == Some("sig") && present(&self.kid) && self.has_key_material()
    }

    fn has_key_material(&self) -> bool {
        if self.leaf_certificate().is_some() {
            return true;
        }
        match self.kty.as_deref() {
            Some("EC") => present(&self.crv) && present(&self.x) && present(&self.y),
            Some("RSA") => present(&self.n) && present(&self.e),
            _ => false,
        }
    }

    fn leaf_certificate(&self) -> Option<&str> {
        self.x5c
            .as_ref()
            .and_then(|chain| chain.first())
            .map(String::as_str)
            .filter(|cert| !cert.is_empty())
    }

    /// Convert to a [`SigningKey`] with PEM-encoded key material
    ///
    /// The public key is the leaf `x5c` certificate when present, otherwise
    /// a SubjectPublicKeyInfo built from the key coordinates. A private key is
    /// produced only when the entry carries a non-empty `d`.
    pub(crate) fn to_signing_key(&self) -> Result<SigningKey, ConversionError> {
        let kid = required("kid", &self.kid)?;
        if kid.len() > MAX_JWK_KID_SIZE {
            return Err(ConversionError::new(format!(
                "field 'kid' too large: {} bytes (maximum: {MAX_JWK_KID_SIZE} bytes)",
                kid.len()
            )));
        }
        if let Some(alg) = &self.alg {
            if alg.len() > MAX_JWK_ALG_SIZE {
                return Err(ConversionError::new(format!(
                    "field 'alg' too large: {} bytes (maximum: {MAX_JWK_ALG_SIZE} bytes)",
                    alg.len()
                )));
            }
        }

        let public_key = match self.leaf_certificate() {
            Some(cert) => pem::encode(
                pem::CERTIFICATE,
                decode_certificate(cert, MAX_JWK_X5C_SIZE)?,
            ),
            None => self.public_key_pem()?,
        };

        let private_key = if present(&self.d) {
            Some(self.private_key_pem()?)
        } else {
            None
        };

        Ok(SigningKey::new(
            kid.to_string(),
            self.alg.clone(),
            public_key,
            private_key,
        ))
    }

    fn curve(&self) -> Result<EcCurve, ConversionError> {
        let crv = required("crv", &self.crv)?;
        EcCurve::from_crv(crv).ok_or_else(|| ConversionError::new(format!("unsupported curve {crv}")))
    }

    fn ec_coordinates(&self) -> Result<(Vec<u8>, Vec<u8>), ConversionError> {
        let x = decode_field("x", required("x", &self.x)?, MAX_JWK_COORDINATE_SIZE)?;
        let y = decode_field("y", required("y", &self.y)?, MAX_JWK_COORDINATE_SIZE)?;
        Ok((x, y))
    }

    fn public_key_pem(&self) -> Result<String, ConversionError> {
        let der = match self.kty.as_deref() {
            Some("EC") => {
                let curve = self.curve()?;
                let (x, y) = self.ec_coordinates()?;
                ec_spki_from_xy(&x, &y, curve)?
            }
            Some("RSA") => {
                let n = decode_field("n", required("n", &self.n)?, MAX_JWK_N_SIZE)?;
                let e = decode_field("e", required("e", &self.e)?, MAX_JWK_E_SIZE)?;
                rsa_spki_from_n_e(&n, &e)?
            }
            Some(kty) => {
                return Err(ConversionError::new(format!("unsupported key type {kty}")));
            }
            None => return Err(ConversionError::new("missing key type (kty)")),
        };
        Ok(pem::encode(pem::PUBLIC_KEY, der))
    }

    fn private_key_pem(&self) -> Result<String, ConversionError> {
        match self.kty.as_deref() {
            Some("EC") => {
                let curve = self.curve()?;
                let (x, y) = self.ec_coordinates()?;
                let d = decode_field("d", required("d", &self.d)?, MAX_JWK_COORDINATE_SIZE)?;
                let der = ec_private_key_der(&d, &x, &y, curve)?;
                Ok(pem::encode(pem::EC_PRIVATE_KEY, der))
            }
            Some("RSA") => {
                let decode = |name: &str, value: &Option<String>, max: usize| {
                    decode_field(name, required(name, value)?, max)
                };
                let n = decode("n", &self.n, MAX_JWK_N_SIZE)?;
                let e = decode("e", &self.e, MAX_JWK_E_SIZE)?;
                let d = decode("d", &self.d, MAX_JWK_N_SIZE)?;
                let p = decode("p", &self.p, MAX_JWK_N_SIZE)?;
                let q = decode("q", &self.q, MAX_JWK_N_SIZE)?;
                let dp = decode("dp", &self.dp, MAX_JWK_N_SIZE)?;
                let dq = decode("dq", &self.dq, MAX_JWK_N_SIZE)?;
                let qi = decode("qi", &self.qi, MAX_JWK_N_SIZE)?;
                let der = rsa_private_key_der(&RsaPrivateComponents {
                    n: &n,
                    e: &e,
                    d: &d,
                    p: &p,
                    q: &q,
                    dp: &dp,
                    dq: &dq,
                    qi: &qi,
                })?;
                Ok(pem::encode(pem::RSA_PRIVATE_KEY, der))
            }
            _ => Err(ConversionError::new(
                "private key material is only supported for EC and RSA keys",
            )),
        }
    }
}

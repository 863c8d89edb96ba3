//! DER encoding utilities for converting JWK components to standard key structures
//!
//! This module uses the RustCrypto `spki` and `der` crates for standards-compliant
//! DER encoding:
//!
//! - public keys as SubjectPublicKeyInfo (RFC 5280)
//! - RSA private keys as PKCS#1 `RSAPrivateKey` (RFC 8017)
//! - EC private keys as SEC1 `ECPrivateKey` (RFC 5915)

use crate::error::ConversionError;
use der::{
    Encode, Sequence,
    asn1::{BitString, BitStringRef, OctetStringRef, UintRef},
};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

/// Largest accepted RSA modulus: 8192 bytes (65536 bits)
const MAX_RSA_MODULUS_SIZE: usize = 8192;

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Create error message for JWK encoding failures
fn der_error(operation: &str, details: impl std::fmt::Display) -> ConversionError {
    ConversionError::new(format!("{operation}: {details}"))
}

/// Elliptic curves accepted in the `crv` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EcCurve {
    P256,
    P384,
    P521,
    Secp256k1,
}

impl EcCurve {
    /// Parse the JWK `crv` name (RFC 7518 Section 6.2.1.1, RFC 8812)
    pub(crate) fn from_crv(crv: &str) -> Option<Self> {
        match crv {
            "P-256" => Some(EcCurve::P256),
            "P-384" => Some(EcCurve::P384),
            "P-521" => Some(EcCurve::P521),
            "secp256k1" => Some(EcCurve::Secp256k1),
            _ => None,
        }
    }

    /// Length in bytes of one coordinate (and of the private scalar)
    pub(crate) fn coordinate_size(&self) -> usize {
        match self {
            EcCurve::P256 | EcCurve::Secp256k1 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    fn oid(&self) -> ObjectIdentifier {
        match self {
            EcCurve::P256 => ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"),
            EcCurve::P384 => ObjectIdentifier::new_unwrap("1.3.132.0.34"),
            EcCurve::P521 => ObjectIdentifier::new_unwrap("1.3.132.0.35"),
            EcCurve::Secp256k1 => ObjectIdentifier::new_unwrap("1.3.132.0.10"),
        }
    }
}

/// RSA public key structure for DER encoding
///
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// PKCS#1 two-prime RSA private key
#[derive(Sequence)]
struct RsaPrivateKey<'a> {
    version: u8,
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
    private_exponent: UintRef<'a>,
    prime1: UintRef<'a>,
    prime2: UintRef<'a>,
    exponent1: UintRef<'a>,
    exponent2: UintRef<'a>,
    coefficient: UintRef<'a>,
}

/// SEC1 EC private key
///
/// ECPrivateKey ::= SEQUENCE {
///     version        INTEGER { ecPrivkeyVer1(1) },
///     privateKey     OCTET STRING,
///     parameters [0] ECParameters OPTIONAL,
///     publicKey  [1] BIT STRING OPTIONAL
/// }
#[derive(Sequence)]
struct EcPrivateKey<'a> {
    version: u8,
    private_key: OctetStringRef<'a>,
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    parameters: Option<ObjectIdentifier>,
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    public_key: Option<BitStringRef<'a>>,
}

/// Decoded RSA private key components
pub(crate) struct RsaPrivateComponents<'a> {
    pub n: &'a [u8],
    pub e: &'a [u8],
    pub d: &'a [u8],
    pub p: &'a [u8],
    pub q: &'a [u8],
    pub dp: &'a [u8],
    pub dq: &'a [u8],
    pub qi: &'a [u8],
}

fn uint<'a>(name: &str, bytes: &'a [u8]) -> Result<UintRef<'a>, ConversionError> {
    UintRef::new(bytes).map_err(|e| der_error(&format!("failed to encode RSA {name}"), e))
}

/// Build DER-encoded RSA SubjectPublicKeyInfo from modulus (n) and exponent (e) bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>, ConversionError> {
    if n.is_empty() || e.is_empty() {
        return Err(der_error("rsa key missing n or e", ""));
    }

    if n.len() > MAX_RSA_MODULUS_SIZE {
        return Err(der_error(
            "RSA modulus too large",
            format!("{} bytes (maximum: {MAX_RSA_MODULUS_SIZE} bytes)", n.len()),
        ));
    }

    let rsa_pubkey = RsaPublicKey {
        modulus: uint("modulus", n)?,
        public_exponent: uint("exponent", e)?,
    };

    let rsa_pubkey_der = rsa_pubkey
        .to_der()
        .map_err(|e| der_error("failed to encode RSA public key", e))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(der::asn1::AnyRef::NULL.into()),
    };

    encode_spki(algorithm, &rsa_pubkey_der)
}

/// Build DER-encoded PKCS#1 RSAPrivateKey
pub(crate) fn rsa_private_key_der(
    components: &RsaPrivateComponents<'_>,
) -> Result<Vec<u8>, ConversionError> {
    if components.n.len() > MAX_RSA_MODULUS_SIZE {
        return Err(der_error(
            "RSA modulus too large",
            format!(
                "{} bytes (maximum: {MAX_RSA_MODULUS_SIZE} bytes)",
                components.n.len()
            ),
        ));
    }

    let key = RsaPrivateKey {
        version: 0,
        modulus: uint("modulus", components.n)?,
        public_exponent: uint("exponent", components.e)?,
        private_exponent: uint("private exponent", components.d)?,
        prime1: uint("prime p", components.p)?,
        prime2: uint("prime q", components.q)?,
        exponent1: uint("exponent dp", components.dp)?,
        exponent2: uint("exponent dq", components.dq)?,
        coefficient: uint("coefficient qi", components.qi)?,
    };

    key.to_der()
        .map_err(|e| der_error("failed to encode RSA private key", e))
}

/// Uncompressed SEC1 point `0x04 || x || y`, checking coordinate lengths
fn ec_point(x: &[u8], y: &[u8], curve: EcCurve) -> Result<Vec<u8>, ConversionError> {
    let size = curve.coordinate_size();
    if x.len() != size || y.len() != size {
        return Err(der_error(
            "invalid EC coordinate length",
            format!(
                "expected {size} bytes, found x={} y={}",
                x.len(),
                y.len()
            ),
        ));
    }

    let mut point = Vec::with_capacity(1 + 2 * size);
    point.push(0x04);
    point.extend_from_slice(x);
    point.extend_from_slice(y);
    Ok(point)
}

/// Build DER-encoded EC SubjectPublicKeyInfo from affine coordinates
pub(crate) fn ec_spki_from_xy(
    x: &[u8],
    y: &[u8],
    curve: EcCurve,
) -> Result<Vec<u8>, ConversionError> {
    let point = ec_point(x, y, curve)?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: EC_PUBLIC_KEY_OID,
        parameters: Some(curve.oid().into()),
    };

    encode_spki(algorithm, &point)
}

/// Build DER-encoded SEC1 ECPrivateKey, embedding curve and public point
pub(crate) fn ec_private_key_der(
    d: &[u8],
    x: &[u8],
    y: &[u8],
    curve: EcCurve,
) -> Result<Vec<u8>, ConversionError> {
    if d.len() != curve.coordinate_size() {
        return Err(der_error(
            "invalid EC private scalar length",
            format!(
                "expected {} bytes, found {}",
                curve.coordinate_size(),
                d.len()
            ),
        ));
    }

    let point = ec_point(x, y, curve)?;

    let key = EcPrivateKey {
        version: 1,
        private_key: OctetStringRef::new(d)
            .map_err(|e| der_error("failed to encode EC private scalar", e))?,
        parameters: Some(curve.oid()),
        public_key: Some(
            BitStringRef::from_bytes(&point)
                .map_err(|e| der_error("failed to encode EC public point", e))?,
        ),
    };

    key.to_der()
        .map_err(|e| der_error("failed to encode EC private key", e))
}

fn encode_spki(
    algorithm: AlgorithmIdentifierOwned,
    subject_public_key: &[u8],
) -> Result<Vec<u8>, ConversionError> {
    let subject_public_key = BitString::from_bytes(subject_public_key)
        .map_err(|e| der_error("failed to create bit string", e))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    };

    spki.to_der()
        .map_err(|e| der_error("failed to encode SPKI", e))
}

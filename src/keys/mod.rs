//! Key material consumed by the validation pipeline
//!
//! Two kinds of key back a trust configuration: byte secrets for the HMAC
//! family and public keys for the RSA/ECDSA families. Key *sourcing* (file,
//! secret manager, PEM bundle) is a provider concern; by the time a key is
//! in a configuration it is already resolved into one of these types.

mod der;

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, ProviderError, Result};

pub use der::{rsa_n_e_from_public_key, rsa_public_key_from_n_e};

/// A byte secret for HMAC verification
///
/// The backing bytes are zeroed when the owning configuration drops the
/// key. The `Debug` form never prints the secret.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    secret: Vec<u8>,
}

impl SecretKey {
    /// Create from secret bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Secret strength in bits
    pub fn bits(&self) -> usize {
        self.secret.len() * 8
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl From<&[u8]> for SecretKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// A public key for RSA/ECDSA verification
#[derive(Debug, Clone)]
pub enum PublicKey {
    /// RSA public key
    Rsa(RsaPublicKey),
    /// ECDSA public key
    Ecdsa(EcdsaPublicKey),
}

impl PublicKey {
    /// Key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            PublicKey::Rsa(_) => "RSA",
            PublicKey::Ecdsa(_) => "EC",
        }
    }

    /// Get as RSA key, or fail with the algorithm that required it
    pub fn as_rsa(&self, algorithm: &str) -> Result<&RsaPublicKey> {
        match self {
            PublicKey::Rsa(key) => Ok(key),
            other => Err(Error::InvalidKeyType {
                algorithm: algorithm.to_string(),
                expected: "RSA".to_string(),
                actual: other.key_type().to_string(),
            }),
        }
    }

    /// Get as ECDSA key, or fail with the algorithm that required it
    pub fn as_ecdsa(&self, algorithm: &str) -> Result<&EcdsaPublicKey> {
        match self {
            PublicKey::Ecdsa(key) => Ok(key),
            other => Err(Error::InvalidKeyType {
                algorithm: algorithm.to_string(),
                expected: "EC".to_string(),
                actual: other.key_type().to_string(),
            }),
        }
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        PublicKey::Rsa(key)
    }
}

impl From<EcdsaPublicKey> for PublicKey {
    fn from(key: EcdsaPublicKey) -> Self {
        PublicKey::Ecdsa(key)
    }
}

/// RSA public key held as modulus/exponent components plus the
/// `RSAPublicKey` DER the verifier consumes
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    modulus: Vec<u8>,
    der: Vec<u8>,
}

impl RsaPublicKey {
    /// Build from big-endian modulus (n) and exponent (e) bytes
    pub fn from_components(n: &[u8], e: &[u8]) -> std::result::Result<Self, ProviderError> {
        let der = der::rsa_public_key_from_n_e(n, e)?;
        Ok(Self {
            modulus: trim_leading_zeros(n),
            der,
        })
    }

    /// Build from an existing `RSAPublicKey` DER blob
    pub fn from_der(der: &[u8]) -> std::result::Result<Self, ProviderError> {
        let (n, _e) = der::rsa_n_e_from_public_key(der)?;
        Ok(Self {
            modulus: n,
            der: der.to_vec(),
        })
    }

    /// Modulus bit length (leading zero bits excluded)
    pub fn modulus_bits(&self) -> usize {
        match self.modulus.first() {
            Some(&first) => self.modulus.len() * 8 - first.leading_zeros() as usize,
            None => 0,
        }
    }

    /// The `RSAPublicKey` DER encoding
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// Curve of an ECDSA public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1)
    P256,
    /// P-384 (secp384r1)
    P384,
    /// P-521 (secp521r1)
    P521,
}

impl EcdsaCurve {
    /// Bit length of the curve's order
    pub fn order_bits(&self) -> usize {
        match self {
            EcdsaCurve::P256 => 256,
            EcdsaCurve::P384 => 384,
            EcdsaCurve::P521 => 521,
        }
    }

    /// Byte length of one affine coordinate
    pub fn coordinate_len(&self) -> usize {
        self.order_bits().div_ceil(8)
    }
}

impl fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcdsaCurve::P256 => write!(f, "P-256"),
            EcdsaCurve::P384 => write!(f, "P-384"),
            EcdsaCurve::P521 => write!(f, "P-521"),
        }
    }
}

/// ECDSA public key held as the uncompressed SEC1 point the verifier
/// consumes
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    curve: EcdsaCurve,
    point: Vec<u8>,
}

impl EcdsaPublicKey {
    /// Build from big-endian affine x/y coordinates
    ///
    /// Coordinates shorter than the curve's width are left-padded.
    pub fn from_components(
        curve: EcdsaCurve,
        x: &[u8],
        y: &[u8],
    ) -> std::result::Result<Self, ProviderError> {
        let width = curve.coordinate_len();
        if x.is_empty() || y.is_empty() || x.len() > width || y.len() > width {
            return Err(ProviderError::LoadError(format!(
                "ec key coordinates do not fit curve {curve}"
            )));
        }

        let mut point = Vec::with_capacity(1 + 2 * width);
        point.push(0x04);
        point.extend(std::iter::repeat(0u8).take(width - x.len()));
        point.extend_from_slice(x);
        point.extend(std::iter::repeat(0u8).take(width - y.len()));
        point.extend_from_slice(y);

        Ok(Self { curve, point })
    }

    /// Build from an uncompressed SEC1 point (`0x04 || x || y`)
    pub fn from_uncompressed_point(
        curve: EcdsaCurve,
        point: &[u8],
    ) -> std::result::Result<Self, ProviderError> {
        let expected = 1 + 2 * curve.coordinate_len();
        if point.len() != expected || point.first() != Some(&0x04) {
            return Err(ProviderError::LoadError(format!(
                "ec key is not an uncompressed {curve} point"
            )));
        }
        Ok(Self {
            curve,
            point: point.to_vec(),
        })
    }

    /// The curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    /// The uncompressed SEC1 point
    pub fn as_point(&self) -> &[u8] {
        &self.point
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

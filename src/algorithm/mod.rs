mod asymmetric;
mod hmac;
mod strength;

pub(crate) use self::asymmetric::verify_asymmetric;
pub(crate) use self::hmac::verify_hmac;
pub use self::strength::{check_public_strength, check_secret_strength};

use crate::error::{Error, Result};

/// Signing algorithm of a trust configuration
///
/// Exactly one algorithm is active per configuration. Token headers are
/// compared against it by exact name; the configured algorithm, never the
/// header, selects the verification routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmId {
    /// Unsecured tokens (empty signature segment). Honored only when it is
    /// the explicitly configured algorithm.
    None,
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,
    /// ECDSA with P-256 and SHA-256
    ES256,
    /// ECDSA with P-384 and SHA-384
    ES384,
    /// ECDSA with P-521 and SHA-512
    ES512,
}

/// Key family an algorithm verifies with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// No key material
    None,
    /// Symmetric byte secrets
    Hmac,
    /// RSA public keys
    Rsa,
    /// ECDSA public keys
    Ecdsa,
}

impl AlgorithmId {
    /// Parse an algorithm name (exact match)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(AlgorithmId::None),
            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),
            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),
            "ES256" => Ok(AlgorithmId::ES256),
            "ES384" => Ok(AlgorithmId::ES384),
            "ES512" => Ok(AlgorithmId::ES512),
            _ => Err(Error::Malformed(format!("unknown algorithm '{s}'"))),
        }
    }

    /// Canonical name as it appears in token headers
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::None => "none",
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
            AlgorithmId::ES256 => "ES256",
            AlgorithmId::ES384 => "ES384",
            AlgorithmId::ES512 => "ES512",
        }
    }

    /// The key family this algorithm verifies with
    pub fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::None => AlgorithmFamily::None,
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => AlgorithmFamily::Rsa,
            AlgorithmId::ES256 | AlgorithmId::ES384 | AlgorithmId::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// Bit strength named by the algorithm suffix (0 for `none`)
    pub fn suffix_bits(&self) -> usize {
        match self {
            AlgorithmId::None => 0,
            AlgorithmId::HS256 | AlgorithmId::RS256 | AlgorithmId::ES256 => 256,
            AlgorithmId::HS384 | AlgorithmId::RS384 | AlgorithmId::ES384 => 384,
            AlgorithmId::HS512 | AlgorithmId::RS512 | AlgorithmId::ES512 => 512,
        }
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

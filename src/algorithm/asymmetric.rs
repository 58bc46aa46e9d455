use aws_lc_rs::signature::{self, UnparsedPublicKey, VerificationAlgorithm};

use crate::algorithm::AlgorithmId;
use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// Verify an RSA or ECDSA signature
///
/// `signature` is the raw (already decoded) signature bytes: PKCS#1 v1.5
/// for RSA, ASN.1 DER for ECDSA. Key type and strength are checked by the
/// caller before this runs.
pub(crate) fn verify_asymmetric(
    algorithm: AlgorithmId,
    signing_input: &str,
    signature: &[u8],
    key: &PublicKey,
) -> Result<()> {
    let (verification, key_bytes): (&'static dyn VerificationAlgorithm, &[u8]) = match algorithm {
        AlgorithmId::RS256 => (
            &signature::RSA_PKCS1_2048_8192_SHA256,
            key.as_rsa(algorithm.as_str())?.as_der(),
        ),
        AlgorithmId::RS384 => (
            &signature::RSA_PKCS1_2048_8192_SHA384,
            key.as_rsa(algorithm.as_str())?.as_der(),
        ),
        AlgorithmId::RS512 => (
            &signature::RSA_PKCS1_2048_8192_SHA512,
            key.as_rsa(algorithm.as_str())?.as_der(),
        ),
        AlgorithmId::ES256 => (
            &signature::ECDSA_P256_SHA256_ASN1,
            key.as_ecdsa(algorithm.as_str())?.as_point(),
        ),
        AlgorithmId::ES384 => (
            &signature::ECDSA_P384_SHA384_ASN1,
            key.as_ecdsa(algorithm.as_str())?.as_point(),
        ),
        AlgorithmId::ES512 => (
            &signature::ECDSA_P521_SHA512_ASN1,
            key.as_ecdsa(algorithm.as_str())?.as_point(),
        ),
        other => {
            return Err(Error::InvalidKeyType {
                algorithm: other.to_string(),
                expected: "RSA or EC".to_string(),
                actual: key.key_type().to_string(),
            })
        }
    };

    UnparsedPublicKey::new(verification, key_bytes)
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureInvalid)
}

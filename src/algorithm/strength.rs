//! Key-strength policy
//!
//! Enforced before any cryptographic primitive is invoked, so a weak or
//! mistyped key is reported as a key problem rather than a signature
//! failure.

use tracing::warn;

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::error::{Error, Result};
use crate::keys::{PublicKey, SecretKey};

/// RSA minimum modulus accepted for any RS* algorithm
const RSA_MIN_BITS: usize = 2048;

/// Check an HMAC secret against the algorithm's named bit strength
///
/// HS256 requires at least 32 secret bytes, HS384 at least 48, HS512 at
/// least 64.
pub fn check_secret_strength(algorithm: AlgorithmId, key: &SecretKey) -> Result<()> {
    debug_assert_eq!(algorithm.family(), AlgorithmFamily::Hmac);

    let min_bits = algorithm.suffix_bits();
    if key.bits() < min_bits {
        return Err(Error::InvalidKeyLength {
            algorithm: algorithm.to_string(),
            actual_bits: key.bits(),
            min_bits,
        });
    }
    Ok(())
}

/// Check a public key against the algorithm's strength and type rules
///
/// RSA moduli below 2048 bits are rejected for every RS* algorithm;
/// RS384/RS512 additionally warn (non-fatal) below 3072/4096 bits. ECDSA
/// curves must carry at least the order bits named by the suffix.
pub fn check_public_strength(algorithm: AlgorithmId, key: &PublicKey) -> Result<()> {
    match algorithm.family() {
        AlgorithmFamily::Rsa => {
            let rsa = key.as_rsa(algorithm.as_str())?;
            let bits = rsa.modulus_bits();
            if bits < RSA_MIN_BITS {
                return Err(Error::InvalidKeyLength {
                    algorithm: algorithm.to_string(),
                    actual_bits: bits,
                    min_bits: RSA_MIN_BITS,
                });
            }

            let recommended = match algorithm {
                AlgorithmId::RS384 => 3072,
                AlgorithmId::RS512 => 4096,
                _ => RSA_MIN_BITS,
            };
            if bits < recommended {
                warn!(
                    algorithm = %algorithm,
                    modulus_bits = bits,
                    recommended_bits = recommended,
                    "RSA modulus below recommended strength for algorithm"
                );
            }
            Ok(())
        }
        AlgorithmFamily::Ecdsa => {
            let ec = key.as_ecdsa(algorithm.as_str())?;
            let bits = ec.curve().order_bits();
            let min_bits = algorithm.suffix_bits();
            if bits < min_bits {
                return Err(Error::InvalidKeyLength {
                    algorithm: algorithm.to_string(),
                    actual_bits: bits,
                    min_bits,
                });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{EcdsaCurve, EcdsaPublicKey, RsaPublicKey};

    #[test]
    fn test_hmac_secret_minimums() {
        let short = SecretKey::new(vec![0u8; 31]);
        let result = check_secret_strength(AlgorithmId::HS256, &short);
        assert!(matches!(
            result,
            Err(Error::InvalidKeyLength {
                actual_bits: 248,
                min_bits: 256,
                ..
            })
        ));

        let exact = SecretKey::new(vec![0u8; 32]);
        assert!(check_secret_strength(AlgorithmId::HS256, &exact).is_ok());

        // 32 bytes satisfies HS256 but not HS512
        assert!(check_secret_strength(AlgorithmId::HS512, &exact).is_err());
        let long = SecretKey::new(vec![0u8; 64]);
        assert!(check_secret_strength(AlgorithmId::HS512, &long).is_ok());
    }

    #[test]
    fn test_rsa_minimum_is_unconditional() {
        // 1024-bit modulus
        let small = PublicKey::Rsa(RsaPublicKey::from_components(&[0xF0; 128], &[0x03]).unwrap());
        for alg in [AlgorithmId::RS256, AlgorithmId::RS384, AlgorithmId::RS512] {
            let result = check_public_strength(alg, &small);
            assert!(matches!(result, Err(Error::InvalidKeyLength { .. })));
        }

        // 2048-bit modulus passes everywhere (RS384/512 only warn)
        let ok = PublicKey::Rsa(RsaPublicKey::from_components(&[0xF0; 256], &[0x03]).unwrap());
        for alg in [AlgorithmId::RS256, AlgorithmId::RS384, AlgorithmId::RS512] {
            assert!(check_public_strength(alg, &ok).is_ok());
        }
    }

    #[test]
    fn test_ecdsa_curve_order_minimum() {
        let p256 = PublicKey::Ecdsa(
            EcdsaPublicKey::from_components(EcdsaCurve::P256, &[0x11; 32], &[0x22; 32]).unwrap(),
        );
        assert!(check_public_strength(AlgorithmId::ES256, &p256).is_ok());
        assert!(check_public_strength(AlgorithmId::ES384, &p256).is_err());
        assert!(check_public_strength(AlgorithmId::ES512, &p256).is_err());

        let p521 = PublicKey::Ecdsa(
            EcdsaPublicKey::from_components(EcdsaCurve::P521, &[0x11; 66], &[0x22; 66]).unwrap(),
        );
        assert!(check_public_strength(AlgorithmId::ES512, &p521).is_ok());
    }

    #[test]
    fn test_wrong_key_type() {
        let rsa = PublicKey::Rsa(RsaPublicKey::from_components(&[0xF0; 256], &[0x03]).unwrap());
        let result = check_public_strength(AlgorithmId::ES256, &rsa);
        assert!(matches!(result, Err(Error::InvalidKeyType { .. })));

        let ec = PublicKey::Ecdsa(
            EcdsaPublicKey::from_components(EcdsaCurve::P256, &[0x11; 32], &[0x22; 32]).unwrap(),
        );
        let result = check_public_strength(AlgorithmId::RS256, &ec);
        assert!(matches!(result, Err(Error::InvalidKeyType { .. })));
    }
}

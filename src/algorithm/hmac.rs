use constant_time_eq::constant_time_eq;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::algorithm::AlgorithmId;
use crate::error::{Error, Result};
use crate::keys::SecretKey;

/// Verify an HMAC signature with constant-time comparison
///
/// `signature` is the raw (already decoded) signature bytes. Key strength
/// is checked by the caller before this runs.
pub(crate) fn verify_hmac(
    algorithm: AlgorithmId,
    signing_input: &str,
    signature: &[u8],
    key: &SecretKey,
) -> Result<()> {
    match algorithm {
        AlgorithmId::HS256 => verify_mac::<Hmac<Sha256>>(signing_input, signature, key.as_bytes()),
        AlgorithmId::HS384 => verify_mac::<Hmac<Sha384>>(signing_input, signature, key.as_bytes()),
        AlgorithmId::HS512 => verify_mac::<Hmac<Sha512>>(signing_input, signature, key.as_bytes()),
        other => Err(Error::InvalidKeyType {
            algorithm: other.to_string(),
            expected: "Secret".to_string(),
            actual: "n/a".to_string(),
        }),
    }
}

fn verify_mac<M: Mac + KeyInit>(signing_input: &str, signature: &[u8], secret: &[u8]) -> Result<()> {
    let mut mac = <M as Mac>::new_from_slice(secret).map_err(|_| Error::SignatureInvalid)?;
    mac.update(signing_input.as_bytes());
    let expected = mac.finalize().into_bytes();

    if signature.len() != expected.len() {
        return Err(Error::SignatureInvalid);
    }

    if constant_time_eq(signature, &expected) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid)
    }
}

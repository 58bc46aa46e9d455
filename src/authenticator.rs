//! Token validation driver
//!
//! [`Authenticator`] runs the full validation pipeline against one
//! immutable [`TrustConfiguration`] snapshot:
//!
//! 1. Size bound and structural decode (three Base64URL segments)
//! 2. Algorithm check (the configured algorithm is authoritative)
//! 3. Key resolution by `kid`, fail-closed
//! 4. Key strength policy, before any cryptography
//! 5. Signature verification
//! 6. Time-window checks with symmetric clock skew
//! 7. Claim assertions, then claim transforms
//! 8. Principal construction
//!
//! Any failing step aborts the pipeline with the matching [`Error`]
//! variant; later steps never run on data an earlier step rejected.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::algorithm::{
    check_public_strength, check_secret_strength, verify_asymmetric, verify_hmac, AlgorithmFamily,
};
use crate::claim::ClaimValue;
use crate::config::{TrustConfiguration, DEFAULT_KEY_ID};
use crate::error::{Error, Result};
use crate::principal::{Credential, Principal};

/// Hard upper bound on accepted token size
///
/// Applied before any decoding so oversize input is rejected without
/// allocation proportional to its size.
pub const MAX_TOKEN_BYTES: usize = 16 * 1024;

/// Token header fields relevant to validation
///
/// Unknown header fields are ignored; `alg` must be present.
#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

/// Validates compact serialized tokens against one trust snapshot
///
/// Cheap to clone; clones share the same configuration. `validate` takes
/// `&self`, so one authenticator can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: Arc<TrustConfiguration>,
}

impl Authenticator {
    pub fn new(config: TrustConfiguration) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The trust snapshot this authenticator validates against
    pub fn config(&self) -> &TrustConfiguration {
        &self.config
    }

    /// Validate a compact serialized token
    ///
    /// Returns a [`Credential`] holding the authenticated principal, or
    /// the first [`Error`] the pipeline hit. Claims become trustworthy
    /// only after this returns `Ok`.
    pub fn validate(&self, token: &str) -> Result<Credential> {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(Error::Malformed(format!(
                "token exceeds {MAX_TOKEN_BYTES} bytes"
            )));
        }

        let (header_b64, payload_b64, signature_b64) = split_segments(token)?;

        let header_bytes = decode_segment(header_b64, "header")?;
        let payload_bytes = decode_segment(payload_b64, "payload")?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|err| Error::Malformed(format!("invalid header JSON: {err}")))?;

        // The configured algorithm decides which verification routine runs;
        // the header only has to agree with it.
        let configured = self.config.algorithm();
        if header.alg != configured.as_str() {
            return Err(Error::AlgorithmMismatch {
                found: header.alg,
                configured: configured.as_str().to_string(),
            });
        }

        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        self.verify_signature(&header, signing_input, signature_b64)?;

        let mut claims = parse_claims(&payload_bytes)?;

        let now = unix_now();
        check_time_window(&claims, now, self.config.clock_skew())?;

        self.check_assertions(&claims)?;
        self.apply_transforms(&mut claims)?;

        let name = match claims.get("sub") {
            Some(value) => value
                .as_string()
                .map_err(|err| Error::Malformed(format!("invalid sub claim: {err}")))?,
            None => None,
        };

        debug!(
            principal = name.as_deref().unwrap_or(crate::principal::ANONYMOUS),
            claims = claims.len(),
            "token validated"
        );

        Ok(Credential::new(Principal::new(name, claims)))
    }

    fn verify_signature(
        &self,
        header: &Header,
        signing_input: &str,
        signature_b64: &str,
    ) -> Result<()> {
        let algorithm = self.config.algorithm();
        let key_id = header.kid.as_deref().unwrap_or(DEFAULT_KEY_ID);

        match algorithm.family() {
            AlgorithmFamily::None => {
                // Unsecured tokens are honored only when explicitly
                // configured, and only with an empty signature segment.
                if signature_b64.is_empty() {
                    Ok(())
                } else {
                    Err(Error::SignatureInvalid)
                }
            }
            AlgorithmFamily::Hmac => {
                let key = self
                    .config
                    .secret_key(key_id)
                    .ok_or_else(|| Error::NoSuchKey(key_id.to_string()))?;
                check_secret_strength(algorithm, key)?;
                let signature = decode_segment(signature_b64, "signature")?;
                verify_hmac(algorithm, signing_input, &signature, key)
            }
            AlgorithmFamily::Rsa | AlgorithmFamily::Ecdsa => {
                let key = self
                    .config
                    .public_key(key_id)
                    .ok_or_else(|| Error::NoSuchKey(key_id.to_string()))?;
                check_public_strength(algorithm, key)?;
                let signature = decode_segment(signature_b64, "signature")?;
                verify_asymmetric(algorithm, signing_input, &signature, key)
            }
        }
    }

    fn check_assertions(&self, claims: &IndexMap<String, ClaimValue>) -> Result<()> {
        let null = ClaimValue::Null;
        for (claim, predicate) in self.config.claim_assertions() {
            // Absent claims are asserted against Null, never skipped.
            let value = claims.get(claim).unwrap_or(&null);
            if !predicate.test(value) {
                return Err(Error::AssertionFailed(claim.to_string()));
            }
        }
        Ok(())
    }

    fn apply_transforms(&self, claims: &mut IndexMap<String, ClaimValue>) -> Result<()> {
        for (claim, value) in claims.iter_mut() {
            if let Some(transformer) = self.config.claim_transform(claim) {
                let current = std::mem::replace(value, ClaimValue::Null);
                *value = transformer.apply(current).map_err(|err| Error::TransformFailed {
                    claim: claim.clone(),
                    reason: err.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

/// Split a compact token into its three segments
///
/// Exactly two dots are required; an unsecured token still carries the
/// trailing dot with an empty third segment.
fn split_segments(token: &str) -> Result<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(Error::Malformed(
            "expected three dot-separated segments".to_string(),
        )),
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| Error::Malformed(format!("invalid Base64URL in {name}: {err}")))
}

/// Parse the payload into an ordered claim map
///
/// The payload must be a JSON object; any other JSON value is malformed.
fn parse_claims(payload: &[u8]) -> Result<IndexMap<String, ClaimValue>> {
    let value: serde_json::Value = serde_json::from_slice(payload)
        .map_err(|err| Error::Malformed(format!("invalid payload JSON: {err}")))?;

    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, ClaimValue::from(v)))
            .collect()),
        _ => Err(Error::Malformed(
            "payload is not a JSON object".to_string(),
        )),
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs() as i64
}

/// Enforce exp, nbf, and iat against the skew-widened window
///
/// All three are optional; when present they must be numeric. The skew
/// widens the window symmetrically on both ends. An issued-at in the
/// future is treated the same as not-before in the future.
fn check_time_window(
    claims: &IndexMap<String, ClaimValue>,
    now: i64,
    skew: Duration,
) -> Result<()> {
    let skew_secs = skew.as_secs();
    let skew = skew_secs as i64;

    if let Some(expired_at) = numeric_claim(claims, "exp")? {
        // Saturate so an exp near i64::MAX reads as "never expires".
        if now > expired_at.saturating_add(skew) {
            return Err(Error::TokenExpired {
                expired_at,
                now,
                skew_secs,
            });
        }
    }

    for claim in ["nbf", "iat"] {
        if let Some(valid_from) = numeric_claim(claims, claim)? {
            if now.saturating_add(skew) < valid_from {
                return Err(Error::NotYetValid {
                    valid_from,
                    now,
                    skew_secs,
                });
            }
        }
    }

    Ok(())
}

fn numeric_claim(claims: &IndexMap<String, ClaimValue>, name: &str) -> Result<Option<i64>> {
    match claims.get(name) {
        Some(value) => value
            .as_i64()
            .map_err(|_| Error::Malformed(format!("non-numeric {name} claim"))),
        None => Ok(None),
    }
}

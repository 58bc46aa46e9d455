//! Trust configuration: the immutable policy a validator closes over
//!
//! A configuration is assembled once (by descriptor-loading code outside
//! this crate), frozen by [`TrustConfigurationBuilder::build`], and shared
//! read-only across concurrent validations.

use std::collections::HashMap;
use std::time::Duration;

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::combinator::{ClaimPredicate, ClaimTransformer};
use crate::error::ConfigError;
use crate::keys::{PublicKey, SecretKey};

/// Sentinel key id used when a token carries no `kid` header
pub const DEFAULT_KEY_ID: &str = "default";

/// Immutable snapshot of the trust policy
///
/// Holds the single active algorithm, the clock-skew tolerance, the keyed
/// secret/public key material, and the per-claim assertion and transform
/// maps. At most one algorithm is active per instance; key maps may be
/// empty only when the algorithm is `none`.
#[derive(Debug)]
pub struct TrustConfiguration {
    algorithm: AlgorithmId,
    clock_skew: Duration,
    secret_keys: HashMap<String, SecretKey>,
    public_keys: HashMap<String, PublicKey>,
    claim_assertions: HashMap<String, Box<dyn ClaimPredicate>>,
    claim_transforms: HashMap<String, Box<dyn ClaimTransformer>>,
}

impl TrustConfiguration {
    /// Start building a configuration for the given algorithm
    pub fn builder(algorithm: AlgorithmId) -> TrustConfigurationBuilder {
        TrustConfigurationBuilder::new(algorithm)
    }

    /// The single configured algorithm
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Clock-skew tolerance applied symmetrically to time-based claims
    pub fn clock_skew(&self) -> Duration {
        self.clock_skew
    }

    /// Look up a secret key by key id
    pub fn secret_key(&self, key_id: &str) -> Option<&SecretKey> {
        self.secret_keys.get(key_id)
    }

    /// Look up a public key by key id
    pub fn public_key(&self, key_id: &str) -> Option<&PublicKey> {
        self.public_keys.get(key_id)
    }

    /// The per-claim assertion map
    pub fn claim_assertions(&self) -> impl Iterator<Item = (&str, &dyn ClaimPredicate)> {
        self.claim_assertions
            .iter()
            .map(|(name, p)| (name.as_str(), p.as_ref()))
    }

    /// Look up the transformer configured for a claim, if any
    pub fn claim_transform(&self, claim: &str) -> Option<&dyn ClaimTransformer> {
        self.claim_transforms.get(claim).map(|t| t.as_ref())
    }
}

/// Builder for [`TrustConfiguration`]
///
/// Consuming setters in the usual builder style; `build()` freezes the
/// snapshot and enforces the key-map invariants.
pub struct TrustConfigurationBuilder {
    algorithm: AlgorithmId,
    clock_skew: Duration,
    secret_keys: HashMap<String, SecretKey>,
    public_keys: HashMap<String, PublicKey>,
    claim_assertions: HashMap<String, Box<dyn ClaimPredicate>>,
    claim_transforms: HashMap<String, Box<dyn ClaimTransformer>>,
}

impl TrustConfigurationBuilder {
    /// Create a builder with no keys, no policy, and zero skew
    pub fn new(algorithm: AlgorithmId) -> Self {
        Self {
            algorithm,
            clock_skew: Duration::ZERO,
            secret_keys: HashMap::new(),
            public_keys: HashMap::new(),
            claim_assertions: HashMap::new(),
            claim_transforms: HashMap::new(),
        }
    }

    /// Set the clock-skew tolerance
    pub fn clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    /// Register a secret key under a key id
    pub fn secret_key(mut self, key_id: impl Into<String>, key: SecretKey) -> Self {
        self.secret_keys.insert(key_id.into(), key);
        self
    }

    /// Register the secret key tried when a token carries no `kid`
    pub fn default_secret_key(self, key: SecretKey) -> Self {
        self.secret_key(DEFAULT_KEY_ID, key)
    }

    /// Register a public key under a key id
    pub fn public_key(mut self, key_id: impl Into<String>, key: impl Into<PublicKey>) -> Self {
        self.public_keys.insert(key_id.into(), key.into());
        self
    }

    /// Register the public key tried when a token carries no `kid`
    pub fn default_public_key(self, key: impl Into<PublicKey>) -> Self {
        self.public_key(DEFAULT_KEY_ID, key)
    }

    /// Assert a predicate over a claim on every validation
    ///
    /// An absent claim is tested as null, not skipped.
    pub fn assert_claim(
        mut self,
        claim: impl Into<String>,
        predicate: impl ClaimPredicate + 'static,
    ) -> Self {
        self.claim_assertions.insert(claim.into(), Box::new(predicate));
        self
    }

    /// Rewrite a claim's value on every validation
    pub fn transform_claim(
        mut self,
        claim: impl Into<String>,
        transformer: impl ClaimTransformer + 'static,
    ) -> Self {
        self.claim_transforms
            .insert(claim.into(), Box::new(transformer));
        self
    }

    /// Freeze the snapshot
    ///
    /// Fails if the key map required by the algorithm family is empty, or
    /// if keys of the wrong family were supplied (including any key at all
    /// for `none`).
    pub fn build(self) -> Result<TrustConfiguration, ConfigError> {
        match self.algorithm.family() {
            AlgorithmFamily::Hmac => {
                if !self.public_keys.is_empty() {
                    return Err(ConfigError::WrongKeyFamily {
                        algorithm: self.algorithm.to_string(),
                        supplied: "public".to_string(),
                    });
                }
                if self.secret_keys.is_empty() {
                    return Err(ConfigError::MissingKeys(self.algorithm.to_string()));
                }
            }
            AlgorithmFamily::Rsa | AlgorithmFamily::Ecdsa => {
                if !self.secret_keys.is_empty() {
                    return Err(ConfigError::WrongKeyFamily {
                        algorithm: self.algorithm.to_string(),
                        supplied: "secret".to_string(),
                    });
                }
                if self.public_keys.is_empty() {
                    return Err(ConfigError::MissingKeys(self.algorithm.to_string()));
                }
            }
            AlgorithmFamily::None => {
                if !self.secret_keys.is_empty() || !self.public_keys.is_empty() {
                    return Err(ConfigError::WrongKeyFamily {
                        algorithm: self.algorithm.to_string(),
                        supplied: "any".to_string(),
                    });
                }
            }
        }

        Ok(TrustConfiguration {
            algorithm: self.algorithm,
            clock_skew: self.clock_skew,
            secret_keys: self.secret_keys,
            public_keys: self.public_keys,
            claim_assertions: self.claim_assertions,
            claim_transforms: self.claim_transforms,
        })
    }
}

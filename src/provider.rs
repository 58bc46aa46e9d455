//! Key-material provider SPI
//!
//! Contracts for sourcing secrets and trust stores from external
//! systems. The crate ships the interfaces only; concrete providers
//! (files, environment, secret managers) live with the embedding
//! application and are registered by name at process start.
//!
//! Provider failures stay in [`ProviderError`]; they occur while a
//! trust configuration is being assembled and are never reported as
//! authentication failures.

use std::collections::HashMap;
use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::AlgorithmId;
use crate::error::ProviderError;
use crate::keys::{PublicKey, SecretKey};

/// Free-form provider options, passed through uninterpreted
pub type ProviderOptions = HashMap<String, String>;

/// An opaque secret obtained from a provider
///
/// Viewable as bytes or UTF-8 text; the backing storage is wiped on
/// drop. `Debug` never prints the material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    material: Vec<u8>,
}

impl Secret {
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self {
            material: material.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }

    /// View the secret as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.material).ok()
    }

    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("len", &self.material.len())
            .finish()
    }
}

/// Sources an opaque secret
pub trait SecretProvider: Send + Sync {
    fn get_secret(&self, options: &ProviderOptions) -> Result<Secret, ProviderError>;
}

/// Sources a symmetric key suitable for a given algorithm
///
/// Implementations must return [`ProviderError::TooShort`] when the
/// available material is below `min_bits`, rather than padding or
/// truncating it.
pub trait SecretKeyProvider: Send + Sync {
    fn get_secret_key(
        &self,
        algorithm: AlgorithmId,
        min_bits: usize,
        options: &ProviderOptions,
    ) -> Result<SecretKey, ProviderError>;
}

/// A store of named public keys produced by a [`TrustStoreProvider`]
///
/// Key ids are unique within a store; iteration order is insertion
/// order of the provider.
#[derive(Debug, Default)]
pub struct TrustStore {
    keys: Vec<(String, PublicKey)>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key under an id, replacing any previous key with that id
    pub fn insert(&mut self, key_id: impl Into<String>, key: PublicKey) {
        let key_id = key_id.into();
        if let Some(slot) = self.keys.iter_mut().find(|(id, _)| *id == key_id) {
            slot.1 = key;
        } else {
            self.keys.push((key_id, key));
        }
    }

    pub fn get(&self, key_id: &str) -> Option<&PublicKey> {
        self.keys
            .iter()
            .find(|(id, _)| id == key_id)
            .map(|(_, key)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PublicKey)> {
        self.keys.iter().map(|(id, key)| (id.as_str(), key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Sources a trust store of named public keys
pub trait TrustStoreProvider: Send + Sync {
    fn get_trust_store(
        &self,
        path: &str,
        unlock_secret: Option<&Secret>,
        options: &ProviderOptions,
    ) -> Result<TrustStore, ProviderError>;
}

type SecretFactory = Box<dyn Fn() -> Box<dyn SecretProvider> + Send + Sync>;
type SecretKeyFactory = Box<dyn Fn() -> Box<dyn SecretKeyProvider> + Send + Sync>;
type TrustStoreFactory = Box<dyn Fn() -> Box<dyn TrustStoreProvider> + Send + Sync>;

/// Explicit name-to-factory registry for providers
///
/// No classpath or plugin discovery: every provider is registered by
/// the embedding application at process start, and unknown names fail
/// with [`ProviderError::NotFound`].
#[derive(Default)]
pub struct ProviderRegistry {
    secrets: HashMap<String, SecretFactory>,
    secret_keys: HashMap<String, SecretKeyFactory>,
    trust_stores: HashMap<String, TrustStoreFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_secret_provider<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SecretProvider> + Send + Sync + 'static,
    {
        self.secrets.insert(name.into(), Box::new(factory));
    }

    pub fn register_secret_key_provider<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SecretKeyProvider> + Send + Sync + 'static,
    {
        self.secret_keys.insert(name.into(), Box::new(factory));
    }

    pub fn register_trust_store_provider<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn TrustStoreProvider> + Send + Sync + 'static,
    {
        self.trust_stores.insert(name.into(), Box::new(factory));
    }

    pub fn secret_provider(&self, name: &str) -> Result<Box<dyn SecretProvider>, ProviderError> {
        self.secrets
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    pub fn secret_key_provider(
        &self,
        name: &str,
    ) -> Result<Box<dyn SecretKeyProvider>, ProviderError> {
        self.secret_keys
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    pub fn trust_store_provider(
        &self,
        name: &str,
    ) -> Result<Box<dyn TrustStoreProvider>, ProviderError> {
        self.trust_stores
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .field("secret_keys", &self.secret_keys.keys().collect::<Vec<_>>())
            .field("trust_stores", &self.trust_stores.keys().collect::<Vec<_>>())
            .finish()
    }
}

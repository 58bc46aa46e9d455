//! # tokengate - Bearer Token Validation and Claim Policy
//!
//! > Validate compact serialized bearer tokens against an immutable trust
//! > snapshot, then hand verified claims to your application as a typed
//! > principal.
//!
//! **tokengate** validates tokens in the three-segment compact form
//! (`header.payload.signature`, each segment Base64URL without padding)
//! against a single configured algorithm and a fixed set of keys. On
//! success it produces a [`Credential`] holding a [`Principal`] with the
//! verified, transformed claim set; on failure it reports exactly one
//! terminal [`Error`].
//!
//! ## Overview
//!
//! Bearer tokens encode claims as a JSON object secured by a signature or
//! message authentication code. Validating them safely means more than
//! checking the signature: the algorithm named in the header must never
//! choose the verification routine (algorithm substitution attacks), key
//! lookup must fail closed, weak keys must be rejected before any
//! cryptography runs, and temporal claims need a bounded clock-skew
//! window.
//!
//! **tokengate** fixes the algorithm at configuration time and treats the
//! header's `alg` as a claim to be checked, not an instruction to follow.
//! Keys are resolved by `kid` against configured maps only; an unknown id
//! is an error, never a fallback. Key strength is enforced before the
//! signature is touched. After verification, configured per-claim
//! assertions and transforms run in order, and only then does the claim
//! set become a principal.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tokengate::*;
//!
//! let config = TrustConfiguration::builder(AlgorithmId::HS256)
//!     .default_secret_key(SecretKey::from("a-secret-of-at-least-32-bytes!!!"))
//!     .clock_skew(std::time::Duration::from_secs(30))
//!     .assert_claim("role", EqualsPredicate::new("admin"))
//!     .build()?;
//!
//! let authenticator = Authenticator::new(config);
//! let credential = authenticator.validate(token_str)?;
//!
//! println!("Subject: {}", credential.principal().name());
//! ```
//!
//! ## Validation Flow
//!
//! Every call to [`Authenticator::validate`] walks a fixed pipeline; a
//! failing step aborts with its own error and later steps never run:
//!
//! ```text
//! compact token
//!     │ size bound, segment split, Base64URL decode
//!     ▼
//! decoded header             Malformed
//!     │ header alg vs configured alg
//!     ▼
//! algorithm checked          AlgorithmMismatch
//!     │ kid lookup (or "default"), fail closed
//!     ▼
//! key resolved               NoSuchKey / InvalidKeyType
//!     │ strength policy before any crypto
//!     ▼
//! key accepted               InvalidKeyLength
//!     │ HMAC / RSA / ECDSA verification
//!     ▼
//! signature verified         SignatureInvalid
//!     │ exp / nbf / iat within skew window
//!     ▼
//! time validated             TokenExpired / NotYetValid
//!     │ per-claim assertions, then transforms
//!     ▼
//! Credential                 AssertionFailed / TransformFailed
//! ```
//!
//! ## Algorithm Support
//!
//! - **HMAC**: HS256, HS384, HS512 (secret length must cover the digest)
//! - **RSA** (PKCS#1 v1.5): RS256, RS384, RS512 (modulus >= 2048 bits)
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//! - **none**: honored only when explicitly configured, and only for
//!   tokens with an empty signature segment
//!
//! ## Claim Access
//!
//! Claims are exposed as [`ClaimValue`] trees preserving payload order.
//! Accessors coerce conservatively: numbers and booleans render as text,
//! but a string never silently becomes a number, and `asInstant`-style
//! access requires a numeric epoch-seconds value. An absent or `null`
//! claim reads as `None` rather than an error.
//!
//! ## Security
//!
//! ### Algorithm Substitution Prevention
//!
//! The configured algorithm is authoritative. A token whose header names
//! any other algorithm is rejected with [`Error::AlgorithmMismatch`]
//! before key material is touched, even if its signature would verify.
//!
//! ### Fail-Closed Key Resolution
//!
//! Key ids resolve only against the configured map for the algorithm's
//! family. A missing id is [`Error::NoSuchKey`]; there is no downloading,
//! discovery, or fallback to another key.
//!
//! ### Key Strength Before Cryptography
//!
//! HMAC secrets shorter than the digest, RSA moduli under 2048 bits, and
//! curves weaker than the hash are rejected with
//! [`Error::InvalidKeyLength`] before any signature computation.
//!
//! ### Timing Attack Protection
//!
//! HMAC comparison is constant-time via the
//! [`constant_time_eq`](https://crates.io/crates/constant_time_eq) crate.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) — JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) — JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) — JSON Web Signature Best Practices

// Core modules
pub mod error;

// Claim model
pub mod claim;
pub mod combinator;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Trust snapshot and validation driver
pub mod authenticator;
pub mod config;
pub mod principal;

// Provider SPI (interface contracts only)
pub mod provider;

// ============================================================================
// PUBLIC API
// ============================================================================

// Validation flow
pub use authenticator::{Authenticator, MAX_TOKEN_BYTES};
pub use principal::{Credential, Principal, ANONYMOUS};

// Configuration
pub use config::{TrustConfiguration, TrustConfigurationBuilder, DEFAULT_KEY_ID};

// Claim model
pub use claim::{ClaimValue, FromClaimValue};
pub use combinator::{
    AnyOfPredicate, Case, CaseFold, ClaimPredicate, ClaimTransformer, DnComponent,
    EqualsPredicate, NoneOfPredicate, PatternReplace, PredicateSequence, ReplaceMode,
    TransformError, TransformerSequence,
};

// Algorithms and key material
pub use algorithm::{AlgorithmFamily, AlgorithmId};
pub use keys::{EcdsaCurve, EcdsaPublicKey, PublicKey, RsaPublicKey, SecretKey};

// Errors
pub use error::{CoercionError, ConfigError, Error, ProviderError, Result};

// Provider SPI
pub use provider::{
    ProviderOptions, ProviderRegistry, Secret, SecretKeyProvider, SecretProvider, TrustStore,
    TrustStoreProvider,
};

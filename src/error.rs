//! Errors for token validation and claim handling
//!
//! Three disjoint families live here:
//! - [`Error`] — the authentication failure family. Every kind is terminal
//!   and non-retryable: validating the same token against the same
//!   configuration again cannot succeed.
//! - [`CoercionError`] — a programmer-facing contract violation raised by
//!   [`ClaimValue`](crate::ClaimValue) accessors when the requested target
//!   type is incompatible with the value's tag.
//! - [`ProviderError`] — failures from key-material providers. These are
//!   never folded into [`Error`]: "key material unobtainable" is not
//!   "signature invalid".

use thiserror::Error;

/// Authentication failures
///
/// One variant per disjoint failure kind in the validation pipeline. All
/// variants are terminal; a caller may retry only after refreshing key
/// material out-of-band.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Structurally invalid token (wrong segment count, bad Base64URL,
    /// bad JSON, oversize input)
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Header algorithm differs from the configured algorithm
    ///
    /// The configured algorithm, never the token header, decides which
    /// verification routine runs.
    #[error("Algorithm mismatch: token declares '{found}', configured '{configured}'")]
    AlgorithmMismatch { found: String, configured: String },

    /// No key material configured under the resolved key id
    #[error("No key configured for key id '{0}'")]
    NoSuchKey(String),

    /// Configured key is of the wrong type for the algorithm
    #[error("Invalid key type for {algorithm}: expected {expected}, got {actual}")]
    InvalidKeyType {
        algorithm: String,
        expected: String,
        actual: String,
    },

    /// Key too weak for the algorithm's minimum strength
    #[error("Invalid key length for {algorithm}: {actual_bits} bits (minimum: {min_bits})")]
    InvalidKeyLength {
        algorithm: String,
        actual_bits: usize,
        min_bits: usize,
    },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Token expired (exp claim outside the skew-widened window)
    #[error("Token expired at {expired_at} (now: {now}, skew: {skew_secs}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        skew_secs: u64,
    },

    /// Token not yet valid (nbf or iat beyond the skew-widened window)
    #[error("Token not valid until {valid_from} (now: {now}, skew: {skew_secs}s)")]
    NotYetValid {
        valid_from: i64,
        now: i64,
        skew_secs: u64,
    },

    /// A configured claim assertion evaluated to false
    #[error("Assertion failed for claim '{0}'")]
    AssertionFailed(String),

    /// A configured claim transformer failed with fail-on-error set
    #[error("Transform failed for claim '{claim}': {reason}")]
    TransformFailed { claim: String, reason: String },
}

/// Claim value coercion failure
///
/// Raised when a [`ClaimValue`](crate::ClaimValue) accessor is asked for a
/// target type incompatible with the value's tag. This indicates a wrong
/// expectation at the call site, not a bad token; it is reported
/// immediately, never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot coerce {actual} claim value to {target}")]
pub struct CoercionError {
    /// The requested target type
    pub target: &'static str,
    /// The actual tag of the value
    pub actual: &'static str,
}

/// Trust configuration assembly failures
///
/// Raised by the configuration builder when the requested snapshot would
/// violate a structural invariant. Like [`ProviderError`], these occur
/// before validation and are never folded into [`Error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The algorithm requires key material and the matching key map is empty
    #[error("Algorithm {0} requires at least one configured key")]
    MissingKeys(String),

    /// Key material of the wrong family was supplied for the algorithm
    #[error("Algorithm {algorithm} cannot use {supplied} keys")]
    WrongKeyFamily {
        algorithm: String,
        supplied: String,
    },
}

/// Key-material provider failures
///
/// Produced by the provider SPI during configuration assembly, before any
/// validation runs. The assembling layer translates or propagates these
/// separately from [`Error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The named secret or store does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider returned material shorter than the required minimum
    #[error("Secret too short: {actual_bits} bits (minimum: {min_bits})")]
    TooShort { actual_bits: usize, min_bits: usize },

    /// A store exists but could not be loaded or unlocked
    #[error("Failed to load trust store: {0}")]
    LoadError(String),

    /// Any other provider-side failure
    #[error("Provider error: {0}")]
    Failure(String),
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, Error>;

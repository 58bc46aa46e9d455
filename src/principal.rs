//! Authenticated output of a successful validation
//!
//! A [`Credential`] owns exactly one [`Principal`]; the principal carries
//! the subject name and the verified, transformed claim set. Both are
//! immutable after construction and created once per successful
//! validation.

use indexmap::IndexMap;

use crate::claim::ClaimValue;

/// Principal name used when the subject claim is absent
pub const ANONYMOUS: &str = "ANONYMOUS";

/// An authenticated identity with its verified claim set
///
/// The claim map preserves the order of claims in the verified payload;
/// keys are unique. All access is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    name: String,
    claims: IndexMap<String, ClaimValue>,
}

impl Principal {
    pub(crate) fn new(name: Option<String>, claims: IndexMap<String, ClaimValue>) -> Self {
        Self {
            name: name.unwrap_or_else(|| ANONYMOUS.to_string()),
            claims,
        }
    }

    /// The subject name, or [`ANONYMOUS`] if the payload carried no subject
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a claim by name
    pub fn claim(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// Claim names in payload order
    pub fn claim_names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    /// Iterate claims in payload order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the claim set is empty
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// The credential returned by a successful validation
///
/// Owns exactly one [`Principal`] and exposes nothing else; it has no
/// lifecycle of its own beyond the validation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    principal: Principal,
}

impl Credential {
    pub(crate) fn new(principal: Principal) -> Self {
        Self { principal }
    }

    /// The authenticated principal
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

use std::fmt;

use crate::claim::ClaimValue;

/// A predicate over a dynamically typed claim value
///
/// Predicates run in the post-verification assertion pipeline. An absent
/// claim is tested as [`ClaimValue::Null`], never skipped.
pub trait ClaimPredicate: fmt::Debug + Send + Sync {
    /// Test the claim value
    fn test(&self, value: &ClaimValue) -> bool;
}

/// True iff the stored value is non-null and equal to the tested value
#[derive(Debug, Clone, PartialEq)]
pub struct EqualsPredicate {
    expected: ClaimValue,
}

impl EqualsPredicate {
    /// Create a predicate matching the given value
    pub fn new(expected: impl Into<ClaimValue>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl ClaimPredicate for EqualsPredicate {
    fn test(&self, value: &ClaimValue) -> bool {
        !self.expected.is_null() && self.expected == *value
    }
}

/// True iff any child predicate is true
///
/// Vacuously true on an empty list (permissive "any" default).
#[derive(Debug, Default)]
pub struct AnyOfPredicate {
    children: Vec<Box<dyn ClaimPredicate>>,
}

impl AnyOfPredicate {
    /// Create from child predicates
    pub fn new(children: Vec<Box<dyn ClaimPredicate>>) -> Self {
        Self { children }
    }
}

impl ClaimPredicate for AnyOfPredicate {
    fn test(&self, value: &ClaimValue) -> bool {
        self.children.is_empty() || self.children.iter().any(|p| p.test(value))
    }
}

/// True iff no child predicate is true
///
/// Vacuously true on an empty list.
#[derive(Debug, Default)]
pub struct NoneOfPredicate {
    children: Vec<Box<dyn ClaimPredicate>>,
}

impl NoneOfPredicate {
    /// Create from child predicates
    pub fn new(children: Vec<Box<dyn ClaimPredicate>>) -> Self {
        Self { children }
    }
}

impl ClaimPredicate for NoneOfPredicate {
    fn test(&self, value: &ClaimValue) -> bool {
        !self.children.iter().any(|p| p.test(value))
    }
}

/// Conjunction of all children, short-circuiting on the first false
///
/// True on an empty list.
#[derive(Debug, Default)]
pub struct PredicateSequence {
    children: Vec<Box<dyn ClaimPredicate>>,
}

impl PredicateSequence {
    /// Create from child predicates
    pub fn new(children: Vec<Box<dyn ClaimPredicate>>) -> Self {
        Self { children }
    }
}

impl ClaimPredicate for PredicateSequence {
    fn test(&self, value: &ClaimValue) -> bool {
        self.children.iter().all(|p| p.test(value))
    }
}

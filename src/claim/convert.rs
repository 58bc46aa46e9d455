//! Closed conversion set for typed claim extraction
//!
//! Conversions form a closed set of [`FromClaimValue`] implementations
//! resolved at compile time; the untyped escape hatch is the
//! implementation for `ClaimValue` itself, which hands back the raw
//! decoded value without prior coercion.

use std::time::SystemTime;

use crate::claim::ClaimValue;
use crate::error::CoercionError;

/// A target type constructible from a single claim value
///
/// Element conversion for [`ClaimValue::as_list`], [`ClaimValue::as_set`],
/// [`ClaimValue::as_map`] and the generic [`ClaimValue::get`] goes through
/// this trait. Implementations follow the scalar accessor rules exactly;
/// a `Null` input fails for non-optional targets (wrap in `Option<T>` to
/// accept nulls).
pub trait FromClaimValue: Sized {
    /// Convert a claim value to `Self`, or fail with the attempted target
    /// and actual tag
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError>;
}

fn reject<T>(value: &ClaimValue, target: &'static str) -> Result<T, CoercionError> {
    Err(CoercionError {
        target,
        actual: value.tag(),
    })
}

impl FromClaimValue for String {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        match value.as_string()? {
            Some(s) => Ok(s),
            None => reject(value, "string"),
        }
    }
}

impl FromClaimValue for bool {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        match value.as_bool()? {
            Some(b) => Ok(b),
            None => reject(value, "boolean"),
        }
    }
}

impl FromClaimValue for i64 {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        match value.as_i64()? {
            Some(i) => Ok(i),
            None => reject(value, "i64"),
        }
    }
}

impl FromClaimValue for f64 {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        match value.as_f64()? {
            Some(f) => Ok(f),
            None => reject(value, "f64"),
        }
    }
}

impl FromClaimValue for SystemTime {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        match value.as_instant()? {
            Some(t) => Ok(t),
            None => reject(value, "instant"),
        }
    }
}

/// Nullable target: a `Null` input becomes `None` instead of failing
impl<T: FromClaimValue> FromClaimValue for Option<T> {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_claim_value(value).map(Some)
        }
    }
}

/// Untyped escape hatch: the raw decoded value passes through unchanged
impl FromClaimValue for ClaimValue {
    fn from_claim_value(value: &ClaimValue) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(
            String::from_claim_value(&ClaimValue::from(5i64)).unwrap(),
            "5"
        );
        assert_eq!(bool::from_claim_value(&ClaimValue::from(true)).unwrap(), true);
        assert_eq!(i64::from_claim_value(&ClaimValue::from(5i64)).unwrap(), 5);
        assert!(i64::from_claim_value(&ClaimValue::from("5")).is_err());
    }

    #[test]
    fn test_null_rejected_for_non_optional() {
        assert!(String::from_claim_value(&ClaimValue::Null).is_err());
        assert_eq!(
            Option::<String>::from_claim_value(&ClaimValue::Null).unwrap(),
            None
        );
    }

    #[test]
    fn test_raw_passthrough() {
        let v = ClaimValue::from("anything");
        assert_eq!(ClaimValue::from_claim_value(&v).unwrap(), v);
    }
}

use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde_json::Number;

use crate::claim::FromClaimValue;
use crate::error::CoercionError;

/// A dynamically typed claim value
///
/// Tagged union over the JSON scalar, array and object cases. The tag is
/// fixed at construction and never mutates; values are immutable and safe
/// to share across concurrent validations.
///
/// # Coercion
///
/// Every accessor follows the same contract:
/// - tag `Null` → `Ok(None)` (total over the null case)
/// - compatible tag → `Ok(Some(converted))`
/// - incompatible tag → `Err(CoercionError)` carrying the requested target
///   and the actual tag
///
/// Narrowing is asymmetric by design: `Number` and `Bool` convert *to*
/// their canonical textual form via [`as_string`](Self::as_string), but a
/// `String` never auto-converts to a number or boolean.
///
/// # Examples
///
/// ```
/// use tokengate::ClaimValue;
///
/// let groups = ClaimValue::from(vec![ClaimValue::from("a"), ClaimValue::from(7i64)]);
/// let names: Vec<String> = groups.as_list().unwrap().unwrap();
/// assert_eq!(names, vec!["a".to_string(), "7".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// JSON null
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number (integer or floating point)
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array
    Array(Vec<ClaimValue>),
    /// JSON object; entry order is the order of appearance in the payload
    Object(IndexMap<String, ClaimValue>),
}

impl ClaimValue {
    /// Tag name for diagnostics and coercion errors
    pub fn tag(&self) -> &'static str {
        match self {
            ClaimValue::Null => "null",
            ClaimValue::Bool(_) => "boolean",
            ClaimValue::Number(_) => "number",
            ClaimValue::String(_) => "string",
            ClaimValue::Array(_) => "array",
            ClaimValue::Object(_) => "object",
        }
    }

    /// Whether the tag is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    fn incompatible(&self, target: &'static str) -> CoercionError {
        CoercionError {
            target,
            actual: self.tag(),
        }
    }

    /// Coerce to a string
    ///
    /// `String` passes through; `Number` and `Bool` convert to their
    /// canonical textual form. Arrays and objects fail.
    pub fn as_string(&self) -> Result<Option<String>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::String(s) => Ok(Some(s.clone())),
            ClaimValue::Number(n) => Ok(Some(n.to_string())),
            ClaimValue::Bool(b) => Ok(Some(b.to_string())),
            _ => Err(self.incompatible("string")),
        }
    }

    /// Coerce to a boolean; only tag `Bool` is compatible
    pub fn as_bool(&self) -> Result<Option<bool>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Bool(b) => Ok(Some(*b)),
            _ => Err(self.incompatible("boolean")),
        }
    }

    /// Coerce to a signed 64-bit integer; only tag `Number` is compatible
    ///
    /// Floating-point numbers narrow by truncation.
    pub fn as_i64(&self) -> Result<Option<i64>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(i))
                } else if let Some(u) = n.as_u64() {
                    i64::try_from(u)
                        .map(Some)
                        .map_err(|_| self.incompatible("i64"))
                } else if let Some(f) = n.as_f64() {
                    Ok(Some(f as i64))
                } else {
                    Err(self.incompatible("i64"))
                }
            }
            _ => Err(self.incompatible("i64")),
        }
    }

    /// Coerce to a 64-bit float; only tag `Number` is compatible
    pub fn as_f64(&self) -> Result<Option<f64>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Number(n) => Ok(n.as_f64()),
            _ => Err(self.incompatible("f64")),
        }
    }

    /// Coerce to an instant using NumericDate semantics
    ///
    /// Requires tag `Number`; the value is interpreted as seconds since the
    /// Unix epoch, independent of locale or timezone.
    pub fn as_instant(&self) -> Result<Option<SystemTime>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Number(n) => {
                let secs = n.as_f64().ok_or_else(|| self.incompatible("instant"))?;
                // Magnitudes beyond Duration's range are not representable
                // as a SystemTime offset.
                let offset = Duration::try_from_secs_f64(secs.abs())
                    .map_err(|_| self.incompatible("instant"))?;
                let instant = if secs >= 0.0 {
                    UNIX_EPOCH + offset
                } else {
                    UNIX_EPOCH - offset
                };
                Ok(Some(instant))
            }
            _ => Err(self.incompatible("instant")),
        }
    }

    /// Coerce to a list with per-element conversion
    ///
    /// Requires tag `Array`; every element goes through the same scalar
    /// coercion rules, so an array of numbers coerces to `Vec<String>`
    /// element by element. Use `Option<T>` as the element type if null
    /// entries must be preserved.
    pub fn as_list<T: FromClaimValue>(&self) -> Result<Option<Vec<T>>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Array(items) => items
                .iter()
                .map(T::from_claim_value)
                .collect::<Result<Vec<T>, CoercionError>>()
                .map(Some),
            _ => Err(self.incompatible("list")),
        }
    }

    /// Coerce to a set with per-element conversion; duplicates collapse
    pub fn as_set<T>(&self) -> Result<Option<HashSet<T>>, CoercionError>
    where
        T: FromClaimValue + Eq + std::hash::Hash,
    {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Array(items) => items
                .iter()
                .map(T::from_claim_value)
                .collect::<Result<HashSet<T>, CoercionError>>()
                .map(Some),
            _ => Err(self.incompatible("set")),
        }
    }

    /// Coerce to an ordered map with per-value conversion
    ///
    /// Requires tag `Object`; entry order is preserved.
    pub fn as_map<T: FromClaimValue>(&self) -> Result<Option<IndexMap<String, T>>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            ClaimValue::Object(entries) => entries
                .iter()
                .map(|(k, v)| T::from_claim_value(v).map(|t| (k.clone(), t)))
                .collect::<Result<IndexMap<String, T>, CoercionError>>()
                .map(Some),
            _ => Err(self.incompatible("map")),
        }
    }

    /// Generic coercion through the closed conversion set
    ///
    /// Equivalent to the matching `as_*` accessor for scalar targets. With
    /// `ClaimValue` as the target type the raw decoded value passes
    /// through untouched, giving untyped access to the raw structure.
    pub fn get<T: FromClaimValue>(&self) -> Result<Option<T>, CoercionError> {
        match self {
            ClaimValue::Null => Ok(None),
            other => T::from_claim_value(other).map(Some),
        }
    }
}

impl From<serde_json::Value> for ClaimValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ClaimValue::Null,
            serde_json::Value::Bool(b) => ClaimValue::Bool(b),
            serde_json::Value::Number(n) => ClaimValue::Number(n),
            serde_json::Value::String(s) => ClaimValue::String(s),
            serde_json::Value::Array(items) => {
                ClaimValue::Array(items.into_iter().map(ClaimValue::from).collect())
            }
            serde_json::Value::Object(entries) => ClaimValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, ClaimValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(s: &str) -> Self {
        ClaimValue::String(s.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(s: String) -> Self {
        ClaimValue::String(s)
    }
}

impl From<bool> for ClaimValue {
    fn from(b: bool) -> Self {
        ClaimValue::Bool(b)
    }
}

impl From<i64> for ClaimValue {
    fn from(i: i64) -> Self {
        ClaimValue::Number(Number::from(i))
    }
}

impl From<u64> for ClaimValue {
    fn from(u: u64) -> Self {
        ClaimValue::Number(Number::from(u))
    }
}

impl From<Vec<ClaimValue>> for ClaimValue {
    fn from(items: Vec<ClaimValue>) -> Self {
        ClaimValue::Array(items)
    }
}

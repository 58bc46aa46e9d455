use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::claim::ClaimValue;

/// Failure raised by a transformer configured to fail on error
///
/// The authenticator attaches the claim name when surfacing this as an
/// authentication failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransformError(pub String);

/// A function over a dynamically typed claim value
///
/// Transformers run after the assertion pipeline; their output becomes the
/// claim's new value in the principal.
pub trait ClaimTransformer: fmt::Debug + Send + Sync {
    /// Rewrite the claim value
    fn apply(&self, value: ClaimValue) -> Result<ClaimValue, TransformError>;
}

/// Left-to-right transformer composition; identity on an empty list
#[derive(Debug, Default)]
pub struct TransformerSequence {
    children: Vec<Box<dyn ClaimTransformer>>,
}

impl TransformerSequence {
    /// Create from child transformers
    pub fn new(children: Vec<Box<dyn ClaimTransformer>>) -> Self {
        Self { children }
    }
}

impl ClaimTransformer for TransformerSequence {
    fn apply(&self, value: ClaimValue) -> Result<ClaimValue, TransformError> {
        self.children
            .iter()
            .try_fold(value, |acc, t| t.apply(acc))
    }
}

/// Replacement mode for [`PatternReplace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Replace the first match only
    First,
    /// Replace all matches
    All,
}

/// Regex-based string replacement
///
/// Non-string values pass through unchanged.
#[derive(Debug)]
pub struct PatternReplace {
    pattern: Regex,
    replacement: String,
    mode: ReplaceMode,
}

impl PatternReplace {
    /// Compile the pattern and create the transformer
    pub fn new(
        pattern: &str,
        replacement: impl Into<String>,
        mode: ReplaceMode,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
            mode,
        })
    }
}

impl ClaimTransformer for PatternReplace {
    fn apply(&self, value: ClaimValue) -> Result<ClaimValue, TransformError> {
        match value {
            ClaimValue::String(s) => {
                let replaced = match self.mode {
                    ReplaceMode::First => self.pattern.replace(&s, self.replacement.as_str()),
                    ReplaceMode::All => self.pattern.replace_all(&s, self.replacement.as_str()),
                };
                Ok(ClaimValue::String(replaced.into_owned()))
            }
            other => Ok(other),
        }
    }
}

/// Case direction for [`CaseFold`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Flatten to upper case
    Upper,
    /// Flatten to lower case
    Lower,
}

/// Flattens string values to a single case; non-strings pass through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseFold {
    case: Case,
}

impl CaseFold {
    /// Create a fold in the given direction
    pub fn new(case: Case) -> Self {
        Self { case }
    }
}

impl ClaimTransformer for CaseFold {
    fn apply(&self, value: ClaimValue) -> Result<ClaimValue, TransformError> {
        match value {
            ClaimValue::String(s) => Ok(ClaimValue::String(match self.case {
                Case::Upper => s.to_uppercase(),
                Case::Lower => s.to_lowercase(),
            })),
            other => Ok(other),
        }
    }
}

/// Extracts the value of a named component from an LDAP-style
/// distinguished name
///
/// Component name matching is case-insensitive. On no match or parse
/// failure the original string passes through unchanged, or the transform
/// fails, depending on `fail_on_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnComponent {
    component: String,
    fail_on_error: bool,
}

impl DnComponent {
    /// Create an extractor for the named RDN component
    pub fn new(component: impl Into<String>, fail_on_error: bool) -> Self {
        Self {
            component: component.into(),
            fail_on_error,
        }
    }

    /// Split a DN on unescaped commas and look up the component
    fn extract(&self, dn: &str) -> Result<Option<String>, TransformError> {
        for rdn in split_unescaped(dn) {
            let rdn = rdn.trim();
            if rdn.is_empty() {
                continue;
            }
            let Some((name, value)) = rdn.split_once('=') else {
                return Err(TransformError(format!(
                    "not a distinguished name: '{dn}'"
                )));
            };
            if name.trim().eq_ignore_ascii_case(&self.component) {
                return Ok(Some(unescape(value.trim())));
            }
        }
        Ok(None)
    }
}

impl ClaimTransformer for DnComponent {
    fn apply(&self, value: ClaimValue) -> Result<ClaimValue, TransformError> {
        let ClaimValue::String(dn) = value else {
            return Ok(value);
        };

        match self.extract(&dn) {
            Ok(Some(component)) => Ok(ClaimValue::String(component)),
            Ok(None) if self.fail_on_error => Err(TransformError(format!(
                "component '{}' not found in '{dn}'",
                self.component
            ))),
            Err(err) if self.fail_on_error => Err(err),
            _ => Ok(ClaimValue::String(dn)),
        }
    }
}

/// Split on commas that are not backslash-escaped
fn split_unescaped(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push('\\');
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut escaped = false;
    for c in input.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_empty_is_identity() {
        let seq = TransformerSequence::default();
        let v = ClaimValue::from("unchanged");
        assert_eq!(seq.apply(v.clone()).unwrap(), v);
    }

    #[test]
    fn test_sequence_composes_left_to_right() {
        let seq = TransformerSequence::new(vec![
            Box::new(DnComponent::new("cn", false)),
            Box::new(CaseFold::new(Case::Upper)),
        ]);
        let out = seq
            .apply(ClaimValue::from("CN=alice, OU=Engineering"))
            .unwrap();
        assert_eq!(out, ClaimValue::from("ALICE"));
    }

    #[test]
    fn test_pattern_replace_first_and_all() {
        let first = PatternReplace::new("o", "0", ReplaceMode::First).unwrap();
        assert_eq!(
            first.apply(ClaimValue::from("fooboo")).unwrap(),
            ClaimValue::from("f0oboo")
        );

        let all = PatternReplace::new("o", "0", ReplaceMode::All).unwrap();
        assert_eq!(
            all.apply(ClaimValue::from("fooboo")).unwrap(),
            ClaimValue::from("f00b00")
        );
    }

    #[test]
    fn test_pattern_replace_passes_non_strings() {
        let t = PatternReplace::new("x", "y", ReplaceMode::All).unwrap();
        let v = ClaimValue::from(42i64);
        assert_eq!(t.apply(v.clone()).unwrap(), v);
    }

    #[test]
    fn test_case_fold() {
        let upper = CaseFold::new(Case::Upper);
        assert_eq!(
            upper.apply(ClaimValue::from("MixedCase")).unwrap(),
            ClaimValue::from("MIXEDCASE")
        );

        let lower = CaseFold::new(Case::Lower);
        assert_eq!(
            lower.apply(ClaimValue::from("MixedCase")).unwrap(),
            ClaimValue::from("mixedcase")
        );
    }

    #[test]
    fn test_dn_component_extracts_named_rdn() {
        let t = DnComponent::new("ou", false);
        let out = t
            .apply(ClaimValue::from("CN=Alice, OU=Engineering, O=Acme"))
            .unwrap();
        assert_eq!(out, ClaimValue::from("Engineering"));
    }

    #[test]
    fn test_dn_component_name_match_is_case_insensitive() {
        let t = DnComponent::new("CN", false);
        let out = t.apply(ClaimValue::from("cn=Alice, O=Acme")).unwrap();
        assert_eq!(out, ClaimValue::from("Alice"));
    }

    #[test]
    fn test_dn_component_escaped_comma() {
        let t = DnComponent::new("o", false);
        let out = t
            .apply(ClaimValue::from(r"CN=Alice, O=Acme\, Inc"))
            .unwrap();
        assert_eq!(out, ClaimValue::from("Acme, Inc"));
    }

    #[test]
    fn test_dn_component_no_match_lenient_vs_strict() {
        let dn = ClaimValue::from("CN=Alice, O=Acme");

        let lenient = DnComponent::new("ou", false);
        assert_eq!(lenient.apply(dn.clone()).unwrap(), dn);

        let strict = DnComponent::new("ou", true);
        assert!(strict.apply(dn).is_err());
    }

    #[test]
    fn test_dn_component_parse_failure_lenient_vs_strict() {
        let not_a_dn = ClaimValue::from("just a plain string");

        let lenient = DnComponent::new("cn", false);
        assert_eq!(lenient.apply(not_a_dn.clone()).unwrap(), not_a_dn);

        let strict = DnComponent::new("cn", true);
        assert!(strict.apply(not_a_dn).is_err());
    }
}

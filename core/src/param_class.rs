//! Parameter classes: regex fragments constraining one path segment.
//!
//! Built-in classes:
//!
//! | Name | Fragment |
//! |------|----------|
//! | `alpha-numeric` (default) | `[A-Za-z0-9_-]{1,64}` |
//! | `alpha` | `[a-zA-Z_-]{1,64}` |
//! | `numeric` | `[0-9]{1,24}` |
//!
//! Anything else is a custom fragment, validated when it is parsed so a bad
//! pattern is caught at registration rather than on the first request.

use crate::{TrailError, MAX_REGEX_PATTERN_LENGTH};
use std::collections::BTreeMap;
use std::fmt;

/// A regex class for one parameter segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParamClass {
    #[default]
    AlphaNumeric,
    Alpha,
    Numeric,
    /// A caller-supplied fragment. Anchoring is added by the pattern compiler.
    Custom(String),
}

impl ParamClass {
    /// Resolve a class name or raw fragment.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::InvalidParamClass`] if the fragment is not a valid
    /// regex or exceeds [`MAX_REGEX_PATTERN_LENGTH`].
    pub fn parse(segment: &str, class: &str) -> Result<Self, TrailError> {
        match class.trim() {
            "alpha-numeric" | "alphanumeric" => Ok(Self::AlphaNumeric),
            "alpha" => Ok(Self::Alpha),
            "numeric" => Ok(Self::Numeric),
            raw => Self::custom(segment, raw),
        }
    }

    /// Validate and wrap a raw regex fragment.
    ///
    /// # Errors
    ///
    /// See [`ParamClass::parse`].
    pub fn custom(segment: &str, fragment: &str) -> Result<Self, TrailError> {
        if fragment.is_empty() || fragment.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(TrailError::InvalidParamClass {
                segment: segment.to_owned(),
                pattern: fragment.to_owned(),
                reason: format!(
                    "fragment length {} outside 1..={MAX_REGEX_PATTERN_LENGTH}",
                    fragment.len()
                ),
            });
        }
        regex::Regex::new(&format!("^(?:{fragment})$")).map_err(|e| {
            TrailError::InvalidParamClass {
                segment: segment.to_owned(),
                pattern: fragment.to_owned(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::Custom(fragment.to_owned()))
    }

    /// The regex fragment for this class.
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::AlphaNumeric => "[A-Za-z0-9_-]{1,64}",
            Self::Alpha => "[a-zA-Z_-]{1,64}",
            Self::Numeric => "[0-9]{1,24}",
            Self::Custom(f) => f,
        }
    }
}

impl fmt::Display for ParamClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaNumeric => f.write_str("alpha-numeric"),
            Self::Alpha => f.write_str("alpha"),
            Self::Numeric => f.write_str("numeric"),
            Self::Custom(p) => write!(f, "/{p}/"),
        }
    }
}

/// Per-route class overrides, keyed by the full raw segment (e.g. `:id`).
pub type ParamOverrides = BTreeMap<String, ParamClass>;

#[cfg(test)]
mod tests {
    use super::*;

    fn is_full_match(class: &ParamClass, value: &str) -> bool {
        regex::Regex::new(&format!("^(?:{})$", class.fragment()))
            .unwrap()
            .is_match(value)
    }

    #[test]
    fn named_classes() {
        assert_eq!(ParamClass::parse(":id", "numeric").unwrap(), ParamClass::Numeric);
        assert_eq!(ParamClass::parse(":s", "alpha").unwrap(), ParamClass::Alpha);
        assert_eq!(
            ParamClass::parse(":s", "alpha-numeric").unwrap(),
            ParamClass::AlphaNumeric
        );
    }

    #[test]
    fn default_class_is_ascii_word_and_dash() {
        let class = ParamClass::default();
        assert!(is_full_match(&class, "user_42-x"));
        assert!(!is_full_match(&class, "café"));
        assert!(!is_full_match(&class, "a.b"));
        assert!(!is_full_match(&class, &"a".repeat(65)));
        assert!(is_full_match(&class, &"a".repeat(64)));
    }

    #[test]
    fn alpha_rejects_digits() {
        assert!(is_full_match(&ParamClass::Alpha, "hello-world"));
        assert!(!is_full_match(&ParamClass::Alpha, "abc1"));
    }

    #[test]
    fn numeric_length_cap() {
        assert!(is_full_match(&ParamClass::Numeric, &"9".repeat(24)));
        assert!(!is_full_match(&ParamClass::Numeric, &"9".repeat(25)));
    }

    #[test]
    fn custom_fragment_kept_verbatim() {
        let class = ParamClass::parse(":slug", "[a-z]+\\.html").unwrap();
        assert_eq!(class.fragment(), "[a-z]+\\.html");
        assert!(is_full_match(&class, "index.html"));
    }

    #[test]
    fn invalid_custom_fragment_is_rejected() {
        let err = ParamClass::parse(":id", "[0-9").unwrap_err();
        assert!(matches!(err, TrailError::InvalidParamClass { ref segment, .. } if segment == ":id"));
    }

    #[test]
    fn empty_fragment_is_rejected() {
        assert!(ParamClass::custom(":id", "").is_err());
    }
}

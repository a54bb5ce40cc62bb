//! Path parameters in both directions.
//!
//! - [`Params`]: values extracted from a matched path, in segment order.
//! - [`UrlArgs`]: caller-supplied values for reverse URL generation,
//!   looked up by name first, then by position.

use std::collections::HashMap;
use std::fmt;

/// Parameter values extracted by a successful match.
///
/// Ordered by segment position; duplicate names keep both entries and
/// [`Params::get`] returns the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Value of the named parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Values in segment order, the shape a positional handler call takes.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(n, v)| format!("{n}={v}")).collect();
        f.write_str(&pairs.join(", "))
    }
}

/// Arguments for building a URL from a route.
///
/// For each parameter segment the builder takes the named value if present,
/// else the positional value at the running parameter index, else an empty
/// string. Missing values never fail the build.
///
/// ```
/// use trail::UrlArgs;
///
/// let args = UrlArgs::new().with("id", 42).push("draft");
/// assert_eq!(args.named("id"), Some("42"));
/// assert_eq!(args.positional(0), Some("draft"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlArgs {
    named: HashMap<String, String>,
    positional: Vec<String>,
}

impl UrlArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.named.insert(name.into(), value.to_string());
        self
    }

    /// Append a positional argument.
    #[must_use]
    pub fn push(mut self, value: impl ToString) -> Self {
        self.positional.push(value.to_string());
        self
    }

    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

impl From<&str> for UrlArgs {
    fn from(value: &str) -> Self {
        Self::new().push(value)
    }
}

impl From<Vec<String>> for UrlArgs {
    fn from(positional: Vec<String>) -> Self {
        Self {
            named: HashMap::new(),
            positional,
        }
    }
}

impl<const N: usize> From<[&str; N]> for UrlArgs {
    fn from(values: [&str; N]) -> Self {
        values.into_iter().fold(Self::new(), |args, v| args.push(v))
    }
}

impl From<HashMap<String, String>> for UrlArgs {
    fn from(named: HashMap<String, String>) -> Self {
        Self {
            named,
            positional: Vec::new(),
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for UrlArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |args, (k, v)| args.with(k, v))
    }
}

impl From<&Params> for UrlArgs {
    fn from(params: &Params) -> Self {
        params.iter().collect()
    }
}

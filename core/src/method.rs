//! HTTP methods and method sets.
//!
//! Two entry points with different strictness:
//!
//! - [`Method::from_str`]: typed path, rejects unknown tokens with
//!   [`TrailError::UnknownMethod`].
//! - [`MethodSet::from_tokens`]: lenient config path. Unknown tokens are
//!   dropped, `all` expands to [`MethodSet::all`].

use crate::TrailError;
use std::fmt;
use std::str::FromStr;

/// The closed set of routable HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "UPPERCASE"))]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
    ];

    /// Lower-case token, as used in method-prefixed action names (`get_index`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl FromStr for Method {
    type Err = TrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| TrailError::UnknownMethod(s.to_owned()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// A set of allowed methods for a route.
///
/// Iteration order is always [`Method::ALL`] order, regardless of insertion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    /// The empty set. A route with no methods never matches.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// What the `all` token expands to: get, post, put, patch, delete.
    ///
    /// `head` and `options` must be named explicitly.
    #[must_use]
    pub fn all() -> Self {
        [
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Patch,
            Method::Delete,
        ]
        .into_iter()
        .collect()
    }

    /// Build a set from raw tokens, silently dropping anything unrecognised.
    ///
    /// A lone `all` token (case-insensitive) expands to [`MethodSet::all`].
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for token in tokens {
            let token = token.as_ref();
            if token.trim().eq_ignore_ascii_case("all") {
                set = set.union(Self::all());
                continue;
            }
            match token.parse::<Method>() {
                Ok(method) => set.insert(method),
                Err(e) => tracing::debug!(error = %e, "dropping method token"),
            }
        }
        set
    }

    pub fn insert(&mut self, method: Method) {
        self.0 |= method.bit();
    }

    pub fn remove(&mut self, method: Method) {
        self.0 &= !method.bit();
    }

    #[must_use]
    pub fn contains(&self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<T: IntoIterator<Item = Method>>(iter: T) -> Self {
        let mut set = Self::empty();
        for m in iter {
            set.insert(m);
        }
        set
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        let mut set = Self::empty();
        set.insert(method);
        set
    }
}

impl<const N: usize> From<[Method; N]> for MethodSet {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|m| m.to_string()).collect();
        f.write_str(&names.join("|"))
    }
}

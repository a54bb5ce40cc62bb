//! The request view the router resolves against.
//!
//! Only method, clean path, scheme and (optionally) host matter for
//! resolution. The clean path is the request URI up to the first `?`,
//! whitespace-trimmed; the remainder is kept as parsed query pairs for callers
//! that want them.

use crate::TrailError;
use std::fmt;
use std::str::FromStr;

/// URL scheme constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl FromStr for Scheme {
    type Err = TrailError;

    /// Accepts `http`, `https`, `http://` and `https://`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.strip_suffix("://").unwrap_or(lowered.as_str()) {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(TrailError::InvalidScheme(s.to_owned())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    path: String,
    scheme: Option<Scheme>,
    host: Option<String>,
    query: Vec<(String, String)>,
}

impl RequestContext {
    /// Build from a method token and a raw request URI (path plus optional query).
    ///
    /// ```
    /// use trail::RequestContext;
    ///
    /// let req = RequestContext::new("GET", " /search?q=rust&page=2 ");
    /// assert_eq!(req.path(), "/search");
    /// assert_eq!(req.query_param("page"), Some("2"));
    /// ```
    pub fn new(method: impl Into<String>, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (uri, Vec::new()),
        };
        Self {
            method: method.into(),
            path: path.trim().to_owned(),
            scheme: None,
            host: None,
            query,
        }
    }

    /// Set the scheme. Unrecognised schemes leave it unset, which fails every
    /// scheme-constrained collection.
    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.parse().ok();
        self
    }

    /// Set the host, lower-cased. An empty host is treated as absent.
    #[must_use]
    pub fn with_host(mut self, host: &str) -> Self {
        let host = host.trim();
        self.host = (!host.is_empty()).then(|| host.to_ascii_lowercase());
        self
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Query pairs in the order they appeared.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value for a query key.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_owned(), v.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

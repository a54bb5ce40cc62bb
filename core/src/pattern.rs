//! `PathPattern`: a compiled route template.
//!
//! A template such as `/users/:id/posts` splits on `/` into segments. A segment
//! containing [`PARAM_MARKER`] is a parameter segment: everything after the
//! marker is the parameter name, and the whole segment is replaced by its
//! [`ParamClass`] fragment. Other segments match literally.
//!
//! # Strict segment count
//!
//! A candidate path must split into exactly as many segments as the template.
//! There are no optional segments and no wildcard tails. This is checked before
//! the regex runs, so a custom fragment that admits `/` still cannot swallow
//! extra segments.
//!
//! ```
//! use trail::{ParamOverrides, PathPattern, UrlArgs};
//!
//! let pattern = PathPattern::compile("/users/:id", &ParamOverrides::new()).unwrap();
//! let params = pattern.matches("/users/42").unwrap();
//! assert_eq!(params.get("id"), Some("42"));
//!
//! assert!(pattern.matches("/users/42/edit").is_none());
//! assert_eq!(pattern.build(&UrlArgs::new().with("id", 7)), "/users/7");
//! ```

use crate::{ParamClass, ParamOverrides, Params, TrailError, UrlArgs, MAX_REGEX_PATTERN_LENGTH};
use regex::Regex;
use std::fmt;

/// Marks a parameter segment.
pub const PARAM_MARKER: char = ':';

/// One `/`-delimited piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param {
        /// The segment as written, e.g. `:id`. Overrides are keyed by this.
        raw: String,
        /// Text after the marker.
        name: String,
        class: ParamClass,
    },
}

impl Segment {
    fn parse(raw: &str, overrides: &ParamOverrides) -> Self {
        match raw.find(PARAM_MARKER) {
            Some(pos) => Self::Param {
                raw: raw.to_owned(),
                name: raw[pos + PARAM_MARKER.len_utf8()..].to_owned(),
                class: overrides.get(raw).cloned().unwrap_or_default(),
            },
            None => Self::Literal(raw.to_owned()),
        }
    }

    fn fragment(&self) -> String {
        match self {
            Self::Literal(text) => regex::escape(text),
            Self::Param { class, .. } => format!("(?:{})", class.fragment()),
        }
    }
}

/// A route template compiled into an anchored matcher.
#[derive(Clone)]
pub struct PathPattern {
    /// Template with surrounding slashes removed.
    prepared: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl PathPattern {
    /// Compile a template.
    ///
    /// `overrides` maps raw parameter segments (`:id`) to their class; any
    /// parameter without an override uses [`ParamClass::AlphaNumeric`].
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::PatternCompile`] if the assembled expression is
    /// rejected by the regex engine or is longer than
    /// [`MAX_REGEX_PATTERN_LENGTH`].
    pub fn compile(template: &str, overrides: &ParamOverrides) -> Result<Self, TrailError> {
        let prepared = template.trim().trim_matches('/').to_owned();
        let segments = Self::segments_of(&prepared, overrides);

        let body: Vec<String> = segments.iter().map(Segment::fragment).collect();
        let source = format!("^/{}$", body.join("/"));

        if source.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(TrailError::PatternCompile {
                template: template.to_owned(),
                reason: format!(
                    "expression length {} exceeds {MAX_REGEX_PATTERN_LENGTH}",
                    source.len()
                ),
            });
        }

        let regex = Regex::new(&source).map_err(|e| TrailError::PatternCompile {
            template: template.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            prepared,
            segments,
            regex,
        })
    }

    /// Split a template into segments without compiling an expression.
    #[must_use]
    pub fn segments_of(template: &str, overrides: &ParamOverrides) -> Vec<Segment> {
        template
            .trim()
            .trim_matches('/')
            .split('/')
            .map(|raw| Segment::parse(raw, overrides))
            .collect()
    }

    /// Build a concrete path from segments. See [`PathPattern::build`].
    #[must_use]
    pub fn build_segments(segments: &[Segment], args: &UrlArgs) -> String {
        let mut index = 0;
        let parts: Vec<&str> = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Param { name, .. } => {
                    let value = args
                        .named(name)
                        .or_else(|| args.positional(index))
                        .unwrap_or("");
                    index += 1;
                    value
                }
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// The normalized template, always with one leading `/`.
    #[must_use]
    pub fn template(&self) -> String {
        format!("/{}", self.prepared)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in segment order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// The anchored expression this pattern evaluates.
    #[must_use]
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Match a candidate path, returning the extracted parameters on success.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let pieces: Vec<&str> = path.trim_matches('/').split('/').collect();
        if pieces.len() != self.segments.len() {
            return None;
        }
        if !self.regex.is_match(path) {
            return None;
        }

        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(pieces) {
            if let Segment::Param { name, .. } = segment {
                params.push(name.as_str(), value);
            }
        }
        Some(params)
    }

    /// Build a concrete path.
    ///
    /// Each parameter takes its named argument, else the positional argument
    /// at the running parameter index, else the empty string.
    #[must_use]
    pub fn build(&self, args: &UrlArgs) -> String {
        Self::build_segments(&self.segments, args)
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("template", &self.template())
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

//! Resolution trace types for debugging route selection.
//!
//! [`Router::resolve_with_trace`](crate::Router::resolve_with_trace) returns
//! the same [`Resolution`] as `resolve` plus the decision path: how every
//! collection fared in selection, and what happened to each route scanned in
//! the selected collection.
//!
//! ```
//! use trail::prelude::*;
//!
//! let mut router: Router = Router::new();
//! router.get("/a", "A@a");
//! router.post("/b", "B@b");
//!
//! let trace = router.resolve_with_trace(&RequestContext::new("POST", "/b"));
//! assert!(trace.resolution.is_match());
//! for step in &trace.routes {
//!     println!("  {}: {}", step.route, step.verdict);
//! }
//! ```

use crate::{Resolution, RouteId};
use std::fmt;

/// Full trace of one resolution.
///
/// `resolution` is always identical to what `resolve` returns for the same
/// request.
pub struct ResolutionTrace<'r, C> {
    pub resolution: Resolution<'r, C>,
    /// Every collection, in registration order.
    pub collections: Vec<CollectionStep>,
    /// Routes scanned in the selected collection. Stops after the first match.
    pub routes: Vec<RouteStep>,
    /// Whether selection fell back to `default` or `error`.
    pub used_fallback: bool,
}

impl<C> fmt::Debug for ResolutionTrace<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionTrace")
            .field("resolution", &self.resolution)
            .field("collections", &self.collections)
            .field("routes", &self.routes)
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

/// How one collection fared during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollectionStep {
    pub name: String,
    pub reserved: bool,
    pub scheme_ok: bool,
    pub host_ok: bool,
    pub prefix_ok: bool,
}

impl CollectionStep {
    /// Whether this collection was eligible for selection.
    #[must_use]
    pub fn candidate(&self) -> bool {
        !self.reserved && self.scheme_ok && self.host_ok && self.prefix_ok
    }
}

/// One route scanned in the selected collection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteStep {
    pub route: RouteId,
    /// Template as registered.
    pub template: String,
    pub verdict: RouteVerdict,
}

/// Why a scanned route did or did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum RouteVerdict {
    MethodMismatch,
    /// The owning collection is not registered.
    Orphaned,
    /// The pattern failed to compile.
    CompileError,
    PathMismatch,
    Matched,
}

impl fmt::Display for RouteVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MethodMismatch => "method mismatch",
            Self::Orphaned => "orphaned",
            Self::CompileError => "compile error",
            Self::PathMismatch => "path mismatch",
            Self::Matched => "matched",
        })
    }
}

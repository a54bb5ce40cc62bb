//! trail - URL routing for HTTP request dispatch
//!
//! Maps an inbound request (method, path, scheme, host) to a registered route,
//! extracts named path parameters, and builds URLs back from named routes.
//!
//! # Architecture
//!
//! - [`Router<C>`]: the routing context. Owns every route, collection and name.
//! - [`Collection`]: a named, ordered group of routes sharing a path prefix,
//!   an optional scheme/hostname constraint and an action namespace.
//! - [`Route<C>`]: methods + path template + [`Handler<C>`].
//! - [`PathPattern`]: a template compiled into an anchored matcher, built
//!   lazily and cached per route.
//! - [`NamedRoutes`]: name → route, for reverse routing via [`Router::url_for`].
//!
//! # Resolution
//!
//! 1. Select a collection. Every non-reserved collection whose scheme, hostname
//!    and prefix admit the request is a candidate; the **last** candidate in
//!    registration order wins. No candidate means `default`, and a missing
//!    `default` means `error`.
//! 2. Scan the selected collection's routes in order. The **first** route whose
//!    methods include the request method and whose pattern matches wins.
//!
//! Resolution never fails. Problems with individual routes (an orphaned
//! collection reference, a pattern that does not compile) are sent to the
//! router's [`Reporter`], attached to the [`Resolution`], and the route is
//! skipped.
//!
//! # Example
//!
//! ```
//! use trail::prelude::*;
//!
//! let mut router: Router = Router::new();
//! router.add_collection(Collection::new("admin").with_target("/admin").with_namespace("Admin"));
//!
//! router.get("/", "Home@index").name("home");
//! router.get("/users/:id", "Users@show").name("user");
//! router.get("/settings", "{ns}@settings").collection("admin");
//!
//! let hit = router.resolve("GET", "/users/42", "http");
//! assert!(hit.is_match());
//! assert_eq!(hit.params().and_then(|p| p.get("id")), Some("42"));
//! assert_eq!(hit.dispatch().and_then(|d| d.as_action()).map(|a| a.key()), Some("Users@show".into()));
//!
//! let admin = router.resolve("GET", "/admin/settings", "http");
//! assert_eq!(admin.collection(), "admin");
//! assert_eq!(admin.dispatch().and_then(|d| d.as_action()).map(|a| a.key()), Some("Admin@settings".into()));
//!
//! assert_eq!(router.url_for("user", &UrlArgs::new().with("id", 7), "/"), "/users/7");
//! assert_eq!(router.url_for("missing", &UrlArgs::new(), "/404"), "/404");
//! ```
//!
//! # Features
//!
//! - `serde`: serde derives on plain data types.
//! - `config`: declarative route tables ([`RouterConfig`]) loaded with
//!   [`Router::load_config`].

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod collection;
mod handler;
mod method;
mod named_routes;
mod param_class;
mod params;
mod pattern;
mod report;
mod request;
mod resolution;
mod route;
mod router;
mod trace;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use collection::Collection;
pub use handler::{ActionBinding, Dispatch, Handler, NamespaceSpec, ResolvedAction};
pub use method::{Method, MethodSet};
pub use named_routes::NamedRoutes;
pub use param_class::{ParamClass, ParamOverrides};
pub use params::{Params, UrlArgs};
pub use pattern::{PathPattern, Segment, PARAM_MARKER};
pub use report::{ErrorReport, Reporter, TracingReporter};
pub use request::{RequestContext, Scheme};
pub use resolution::Resolution;
pub use route::{Route, RouteId};
pub use router::{CollectionMut, RouteMut, Router};

// Trace types
pub use trace::{CollectionStep, ResolutionTrace, RouteStep, RouteVerdict};

#[cfg(feature = "config")]
pub use config::{CollectionConfig, MethodsConfig, RouteConfig, RouterConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use trail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core types
        Collection,
        Dispatch,
        // Reporting
        ErrorReport,
        Handler,
        Method,
        MethodSet,
        ParamClass,
        Params,
        Reporter,
        RequestContext,
        Resolution,
        // Trace types
        ResolutionTrace,
        Route,
        RouteId,
        Router,
        Scheme,
        // Errors
        TrailError,
        UrlArgs,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the fallback collection used when no prefix collection is selected.
pub const DEFAULT_COLLECTION: &str = "default";

/// Name of the collection used when `default` is missing.
pub const ERROR_COLLECTION: &str = "error";

/// Maximum length of a compiled route expression or custom parameter fragment.
///
/// Regex compilation is expensive even with the linear-time `regex` crate, so
/// oversized templates are rejected instead of compiled.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from route construction and validation.
///
/// None of these escape resolution: while resolving they become
/// [`ErrorReport`]s and the offending route is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrailError {
    /// A method token outside the routable set.
    #[error("unknown HTTP method \"{0}\"")]
    UnknownMethod(String),

    /// A custom parameter fragment that is too long or does not compile.
    #[error("invalid parameter class for \"{segment}\" (\"{pattern}\"): {reason}")]
    InvalidParamClass {
        /// The raw parameter segment, e.g. `:id`.
        segment: String,
        /// The fragment as written.
        pattern: String,
        reason: String,
    },

    /// A scheme other than http or https.
    #[error("invalid scheme \"{0}\", expected http or https")]
    InvalidScheme(String),

    /// A route's owning collection does not exist in the router.
    #[error("route {route} belongs to collection \"{collection}\", which is not registered")]
    OrphanedRoute { route: String, collection: String },

    /// A route template whose expression the regex engine rejects.
    #[error("route template \"{template}\" failed to compile: {reason}")]
    PatternCompile { template: String, reason: String },
}

//! Declarative route tables.
//!
//! A [`RouterConfig`] deserializes from JSON or YAML and is applied with
//! [`Router::load_config`]. Loading never fails: invalid entries are dropped,
//! reported, and returned so the caller can surface them.
//!
//! ```yaml
//! collections:
//!   - name: admin
//!     target: /admin        # alias: path
//!     ns: Admin             # alias of namespace
//!     scheme: https
//!     host: admin.example.com
//!     prefix: true          # get_settings instead of settings
//!     routes:
//!       - methods: get
//!         path: /settings
//!         handler: "{ns}@settings"
//!         as: admin.settings
//! routes:
//!   - methods: [get, post]
//!     path: /users/:id
//!     handler: Users@show
//!     params: { ":id": numeric }
//! ```
//!
//! | Key | Aliases |
//! |-----|---------|
//! | `namespace` | `ns` |
//! | `hostname` | `host` |
//! | `target` | `path` (collections only) |
//! | `path` | `uri` (routes) |
//! | `handler` | `action`, `callback` |
//! | `name` | `as`, or a `name`/`as` key inside `params` |

use crate::{
    ErrorReport, Handler, Method, MethodSet, ParamClass, ParamOverrides, Router, Scheme,
    PARAM_MARKER,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A whole route table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouterConfig {
    /// Applied in order. Order is selection priority (last match wins).
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,

    /// Routes outside any collection block. They go to their `collection`
    /// key, or `default`.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl RouterConfig {
    /// Parse a JSON route table.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is not a route table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One collection and the routes registered into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub name: String,

    #[serde(default, alias = "ns")]
    pub namespace: Option<String>,

    /// `http`, `https`, `http://` or `https://`.
    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default, alias = "host")]
    pub hostname: Option<String>,

    #[serde(default, alias = "path")]
    pub target: Option<String>,

    /// Prefix action names with the request method.
    #[serde(default)]
    pub prefix: bool,

    #[serde(default)]
    pub reserved: bool,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub methods: MethodsConfig,

    #[serde(alias = "uri")]
    pub path: String,

    #[serde(alias = "action", alias = "callback")]
    pub handler: String,

    /// Parameter segment → class name or regex fragment. Keys may omit the
    /// leading `:`.
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    #[serde(default, alias = "as")]
    pub name: Option<String>,

    /// Ignored for routes nested in a collection block.
    #[serde(default)]
    pub collection: Option<String>,
}

/// `methods: get`, `methods: "get|post"` or `methods: [get, post]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MethodsConfig {
    One(String),
    Many(Vec<String>),
}

impl MethodsConfig {
    /// Individual tokens, splitting a single string on `|` and `,`.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::One(s) => s
                .split(['|', ','])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect(),
            Self::Many(v) => v.iter().map(|s| s.trim()).collect(),
        }
    }
}

impl<C> Router<C> {
    /// Apply a route table on top of the current state.
    ///
    /// Collections are created or updated in order, then their routes are
    /// registered, then the top-level routes. Invalid entries (unknown method
    /// tokens, bad schemes, invalid parameter classes, routes without methods
    /// or handler) are dropped. Every dropped entry is reported and returned.
    pub fn load_config(&mut self, config: &RouterConfig) -> Vec<ErrorReport> {
        let mut reports = Vec::new();
        for collection in &config.collections {
            self.load_collection(collection, &mut reports);
        }
        for route in &config.routes {
            self.load_route(route, route.collection.as_deref(), &mut reports);
        }
        for report in &reports {
            self.reporter().report(report);
        }
        tracing::debug!(
            collections = config.collections.len(),
            routes = self.route_count(),
            dropped = reports.len(),
            "route table loaded"
        );
        reports
    }

    fn load_collection(&mut self, config: &CollectionConfig, reports: &mut Vec<ErrorReport>) {
        let name = config.name.trim();
        if name.is_empty() {
            reports.push(ErrorReport::new("collection without a name"));
            return;
        }

        let scheme = match config.scheme.as_deref().map(str::parse::<Scheme>) {
            None => None,
            Some(Ok(scheme)) => Some(scheme),
            Some(Err(e)) => {
                reports.push(ErrorReport::from(&e).with("collection", name));
                None
            }
        };

        {
            let mut collection = self.collection_entry(name);
            if let Some(target) = &config.target {
                collection.set_target(target);
            }
            if scheme.is_some() {
                collection.set_scheme(scheme);
            }
            if let Some(hostname) = &config.hostname {
                collection.set_hostname(hostname);
            }
            if let Some(namespace) = &config.namespace {
                collection.set_namespace(Some(namespace.clone()));
            }
            collection.set_method_prefix(config.prefix);
            collection.set_reserved(config.reserved);
        }

        for route in &config.routes {
            self.load_route(route, Some(name), reports);
        }
    }

    fn load_route(
        &mut self,
        config: &RouteConfig,
        collection: Option<&str>,
        reports: &mut Vec<ErrorReport>,
    ) {
        let path = config.path.as_str();

        let mut methods = MethodSet::empty();
        for token in config.methods.tokens() {
            if token.eq_ignore_ascii_case("all") {
                methods = methods.union(MethodSet::all());
                continue;
            }
            match token.parse::<Method>() {
                Ok(method) => methods.insert(method),
                Err(e) => reports.push(ErrorReport::from(&e).with("path", path)),
            }
        }
        if methods.is_empty() {
            reports.push(ErrorReport::new("route has no valid methods").with("path", path));
            return;
        }
        if config.handler.trim().is_empty() {
            reports.push(ErrorReport::new("route has no handler").with("path", path));
            return;
        }

        let mut name = config.name.clone();
        let mut overrides = ParamOverrides::new();
        for (key, value) in &config.params {
            // `name`/`as` name the route unless the template has such a parameter.
            if (key == "name" || key == "as") && !has_param(path, key) {
                name.get_or_insert_with(|| value.clone());
                continue;
            }
            let segment = if key.contains(PARAM_MARKER) {
                key.clone()
            } else {
                format!("{PARAM_MARKER}{key}")
            };
            match ParamClass::parse(&segment, value) {
                Ok(class) => {
                    overrides.insert(segment, class);
                }
                Err(e) => reports.push(ErrorReport::from(&e).with("path", path)),
            }
        }

        let collection = collection.or(config.collection.as_deref());
        let id = self
            .register_route(methods, path, Handler::action(&config.handler), overrides, collection)
            .id();
        if let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            self.name_route(id, name);
        }
    }
}

/// Whether `template` has a parameter segment called `name`.
fn has_param(template: &str, name: &str) -> bool {
    template.split('/').any(|segment| {
        segment
            .split_once(PARAM_MARKER)
            .is_some_and(|(_, param)| param == name)
    })
}

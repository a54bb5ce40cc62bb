//! `Collection`: a named, ordered group of routes.
//!
//! A collection carries the settings its routes share: a path prefix
//! (`target`), an optional scheme and hostname constraint, the namespace that
//! bare action bindings resolve into, and whether actions get a method prefix.
//!
//! Route order inside a collection is match priority: the first route that
//! matches wins, so register specific routes before general ones.

use crate::{Method, Params, RouteId, Router, Scheme};

/// A named group of routes sharing prefix, scheme, hostname and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    target: Option<String>,
    scheme: Option<Scheme>,
    hostname: Option<String>,
    namespace: Option<String>,
    prefix_methods: bool,
    reserved: bool,
    routes: Vec<RouteId>,
}

impl Collection {
    /// An empty, unreserved collection with no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            scheme: None,
            hostname: None,
            namespace: None,
            prefix_methods: false,
            reserved: false,
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: &str) -> Self {
        self.set_target(target);
        self
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.set_hostname(hostname);
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Prefix resolved action names with the request method (`get_index`).
    #[must_use]
    pub fn with_method_prefix(mut self, enabled: bool) -> Self {
        self.prefix_methods = enabled;
        self
    }

    /// Exclude this collection from prefix selection.
    #[must_use]
    pub fn with_reserved(mut self, reserved: bool) -> Self {
        self.reserved = reserved;
        self
    }

    /// Set the path prefix.
    ///
    /// Surrounding whitespace, `/` and `\` are trimmed and a single leading `/`
    /// is added. A target that trims to nothing clears the prefix.
    pub fn set_target(&mut self, target: &str) {
        let trimmed = target.trim_matches(|c: char| c.is_whitespace() || c == '/' || c == '\\');
        self.target = (!trimmed.is_empty()).then(|| format!("/{trimmed}"));
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn set_scheme(&mut self, scheme: Option<Scheme>) {
        self.scheme = scheme;
    }

    /// Set the hostname constraint, lower-cased. Empty clears it.
    pub fn set_hostname(&mut self, hostname: &str) {
        let hostname = hostname.trim();
        self.hostname = (!hostname.is_empty()).then(|| hostname.to_ascii_lowercase());
    }

    pub fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
    }

    pub fn set_method_prefix(&mut self, enabled: bool) {
        self.prefix_methods = enabled;
    }

    pub fn set_reserved(&mut self, reserved: bool) {
        self.reserved = reserved;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    #[must_use]
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn method_prefix(&self) -> bool {
        self.prefix_methods
    }

    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Route ids in match-priority order.
    #[must_use]
    pub fn route_ids(&self) -> &[RouteId] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: RouteId) -> bool {
        self.routes.contains(&id)
    }

    /// True iff a target is set and `path` starts with it, ignoring ASCII case.
    ///
    /// No segment boundary is required after the prefix: `/use` admits `/users`.
    #[must_use]
    pub fn prefix_matches(&self, path: &str) -> bool {
        self.target.as_deref().is_some_and(|target| {
            path.get(..target.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(target))
        })
    }

    /// True if unconstrained, else the request scheme must equal the constraint.
    #[must_use]
    pub fn scheme_allows(&self, scheme: Option<Scheme>) -> bool {
        match self.scheme {
            None => true,
            Some(required) => scheme == Some(required),
        }
    }

    /// True if unconstrained or the request carries no host; else the hosts
    /// must be equal ignoring ASCII case.
    #[must_use]
    pub fn host_allows(&self, host: Option<&str>) -> bool {
        match (self.hostname.as_deref(), host) {
            (Some(required), Some(host)) => required.eq_ignore_ascii_case(host),
            _ => true,
        }
    }

    /// First route in this collection matching `method` and `path`.
    ///
    /// Problems with individual routes are sent to the router's reporter and
    /// that route is skipped.
    #[must_use]
    pub fn resolve<C>(&self, router: &Router<C>, method: Method, path: &str) -> Option<(RouteId, Params)> {
        let mut reports = Vec::new();
        let found = router
            .scan(self, method, path, &mut reports, None)
            .map(|(id, params, _)| (id, params));
        for report in &reports {
            router.reporter().report(report);
        }
        found
    }

    pub(crate) fn add(&mut self, id: RouteId) {
        if !self.routes.contains(&id) {
            self.routes.push(id);
        }
    }

    /// Move `other`'s routes to the end of this collection.
    pub(crate) fn adopt_routes(&mut self, other: &mut Collection) {
        for id in std::mem::take(&mut other.routes) {
            self.add(id);
        }
    }

    pub(crate) fn remove(&mut self, id: RouteId) -> bool {
        let before = self.routes.len();
        self.routes.retain(|r| *r != id);
        self.routes.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_normalization() {
        let c = Collection::new("x").with_target("  /admin/ ");
        assert_eq!(c.target(), Some("/admin"));

        let c = Collection::new("x").with_target("\\api\\v1\\");
        assert_eq!(c.target(), Some("/api\\v1"));

        let c = Collection::new("x").with_target("nested/path");
        assert_eq!(c.target(), Some("/nested/path"));
    }

    #[test]
    fn empty_target_clears_prefix() {
        let c = Collection::new("x").with_target("/");
        assert_eq!(c.target(), None);
        assert!(!c.prefix_matches("/anything"));
    }

    #[test]
    fn no_target_never_prefix_matches() {
        let c = Collection::new("x");
        assert!(!c.prefix_matches("/"));
        assert!(!c.prefix_matches(""));
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let c = Collection::new("x").with_target("/Admin");
        assert!(c.prefix_matches("/admin/settings"));
        assert!(c.prefix_matches("/ADMIN"));
        assert!(!c.prefix_matches("/adm"));
    }

    #[test]
    fn prefix_has_no_segment_boundary() {
        let c = Collection::new("x").with_target("/use");
        assert!(c.prefix_matches("/users"));
    }

    #[test]
    fn prefix_on_multibyte_path_does_not_panic() {
        let c = Collection::new("x").with_target("/ab");
        assert!(!c.prefix_matches("/é"));
    }

    #[test]
    fn scheme_constraint() {
        let open = Collection::new("x");
        assert!(open.scheme_allows(None));
        assert!(open.scheme_allows(Some(Scheme::Http)));

        let secure = Collection::new("x").with_scheme(Scheme::Https);
        assert!(secure.scheme_allows(Some(Scheme::Https)));
        assert!(!secure.scheme_allows(Some(Scheme::Http)));
        assert!(!secure.scheme_allows(None));
    }

    #[test]
    fn host_constraint() {
        let c = Collection::new("x").with_hostname("API.example.com");
        assert_eq!(c.hostname(), Some("api.example.com"));
        assert!(c.host_allows(Some("api.example.com")));
        assert!(!c.host_allows(Some("www.example.com")));
        assert!(c.host_allows(None));
        assert!(Collection::new("y").host_allows(Some("anything")));
    }

    #[test]
    fn add_is_idempotent_and_remove_reports() {
        let mut c = Collection::new("x");
        c.add(RouteId(1));
        c.add(RouteId(1));
        c.add(RouteId(2));
        assert_eq!(c.route_ids(), &[RouteId(1), RouteId(2)]);
        assert!(c.remove(RouteId(1)));
        assert!(!c.remove(RouteId(1)));
        assert_eq!(c.len(), 1);
    }
}

//! `Router`: the routing context.
//!
//! One router owns every route, collection and route name for a serving
//! context. Build it during start-up, then resolve against it; resolution takes
//! `&self`, so a finished router can be shared across threads.
//!
//! Routes live in an arena indexed by [`RouteId`]. Collections hold ids, and
//! each route records its owning collection by name, looked up at use time.

use crate::trace::{CollectionStep, ResolutionTrace, RouteStep, RouteVerdict};
use crate::{
    resolution::Matched, Collection, Dispatch, ErrorReport, Handler, Method, MethodSet,
    NamedRoutes, ParamClass, ParamOverrides, Params, PathPattern, Reporter, RequestContext,
    Resolution, Route, RouteId, TracingReporter, TrailError, UrlArgs, DEFAULT_COLLECTION,
    ERROR_COLLECTION,
};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Routing context: collections, routes, names and an error reporter.
///
/// `C` is the application's callable handler type. Routers that only bind
/// actions can leave it at the default `()`.
pub struct Router<C = ()> {
    collections: Vec<Collection>,
    routes: Vec<Route<C>>,
    named: NamedRoutes,
    reporter: Box<dyn Reporter>,
}

impl<C> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Router<C> {
    /// An empty router with the reserved `default` and `error` collections,
    /// reporting through [`TracingReporter`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(TracingReporter)
    }

    pub fn with_reporter(reporter: impl Reporter + 'static) -> Self {
        Self {
            collections: vec![
                Collection::new(DEFAULT_COLLECTION).with_reserved(true),
                Collection::new(ERROR_COLLECTION).with_reserved(true),
            ],
            routes: Vec::new(),
            named: NamedRoutes::new(),
            reporter: Box::new(reporter),
        }
    }

    pub fn set_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporter = Box::new(reporter);
    }

    #[must_use]
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    // ── Collections ─────────────────────────────────────────────────────────

    /// Register a collection.
    ///
    /// An existing collection with the same name has its settings replaced and
    /// keeps its routes, in order. `default` and `error` stay reserved.
    pub fn add_collection(&mut self, collection: Collection) -> &Collection {
        let mut collection = collection;
        if is_fallback(collection.name()) {
            collection.set_reserved(true);
        }
        let name = collection.name().to_owned();
        let index = match self.position(&name) {
            Some(i) => {
                let mut old = std::mem::replace(&mut self.collections[i], collection);
                self.collections[i].adopt_routes(&mut old);
                i
            }
            None => self.push_collection(collection),
        };
        self.invalidate_owned_by(&name);
        tracing::debug!(collection = %name, "collection registered");
        &self.collections[index]
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    #[must_use]
    pub fn has_collection(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Edit an existing collection. Compiled patterns of its routes are
    /// discarded when the handle drops.
    pub fn collection_mut(&mut self, name: &str) -> Option<CollectionMut<'_, C>> {
        let index = self.position(name)?;
        Some(CollectionMut {
            router: self,
            index,
        })
    }

    /// Edit a collection, creating an empty one if it does not exist.
    pub fn collection_entry(&mut self, name: &str) -> CollectionMut<'_, C> {
        let index = match self.position(name) {
            Some(i) => i,
            None => self.push_collection(Collection::new(name)),
        };
        CollectionMut {
            router: self,
            index,
        }
    }

    /// Remove a collection. The reserved `default` and `error` collections
    /// cannot be removed.
    ///
    /// Its routes stay registered and named but become orphaned: they no
    /// longer match, and building their URLs reports the missing collection.
    pub fn remove_collection(&mut self, name: &str) -> Option<Collection> {
        if is_fallback(name) {
            tracing::debug!(collection = name, "refusing to remove reserved collection");
            return None;
        }
        let index = self.position(name)?;
        let removed = self.collections.remove(index);
        self.invalidate_owned_by(name);
        Some(removed)
    }

    /// Collections in registration order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(Collection::name)
    }

    // ── Registration ────────────────────────────────────────────────────────

    /// Register a route, in `collection` or else in `default`.
    ///
    /// A route with an empty method set is kept but never matches.
    pub fn register_route(
        &mut self,
        methods: impl Into<MethodSet>,
        template: &str,
        handler: impl Into<Handler<C>>,
        overrides: ParamOverrides,
        collection: Option<&str>,
    ) -> RouteMut<'_, C> {
        let methods = methods.into();
        if methods.is_empty() {
            tracing::debug!(template, "route registered without methods will never match");
        }
        let id = RouteId(self.routes.len());
        self.routes.push(Route::new(
            id,
            methods,
            template,
            handler.into(),
            overrides,
            DEFAULT_COLLECTION,
        ));
        self.assign(id, collection.unwrap_or(DEFAULT_COLLECTION));
        tracing::trace!(route = %id, template, %methods, "route registered");
        RouteMut { router: self, id }
    }

    /// Register a single-method route in `default`.
    pub fn add_route(
        &mut self,
        method: Method,
        template: &str,
        handler: impl Into<Handler<C>>,
    ) -> RouteMut<'_, C> {
        self.register_route(method, template, handler, ParamOverrides::new(), None)
    }

    pub fn get(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Get, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Post, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Put, template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Patch, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Delete, template, handler)
    }

    pub fn head(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Head, template, handler)
    }

    pub fn options(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.add_route(Method::Options, template, handler)
    }

    /// Register for get, post, put, patch and delete.
    pub fn any(&mut self, template: &str, handler: impl Into<Handler<C>>) -> RouteMut<'_, C> {
        self.register_route(MethodSet::all(), template, handler, ParamOverrides::new(), None)
    }

    /// Move a route to another collection, creating it if needed.
    ///
    /// Returns `false` for an unknown id.
    pub fn assign(&mut self, id: RouteId, collection: &str) -> bool {
        let Some(route) = self.routes.get(id.0) else {
            return false;
        };
        let previous = route.collection().to_owned();
        if previous == collection && self.collection(collection).is_some_and(|c| c.contains(id)) {
            return true;
        }
        if let Some(prev) = self.position(&previous) {
            self.collections[prev].remove(id);
        }
        let index = match self.position(collection) {
            Some(i) => i,
            None => self.push_collection(Collection::new(collection)),
        };
        self.collections[index].add(id);
        self.routes[id.0].set_collection(collection);
        true
    }

    /// Bind `name` to a route. A name already in use moves to this route.
    ///
    /// Returns `false` for an unknown id.
    pub fn name_route(&mut self, id: RouteId, name: &str) -> bool {
        if id.0 >= self.routes.len() {
            return false;
        }
        if let Some(prev) = self.named.register(name, id) {
            if prev != id {
                tracing::debug!(name, from = %prev, to = %id, "route name rebound");
                if let Some(old) = self.routes.get_mut(prev.0) {
                    if old.name() == Some(name) {
                        old.set_name(None);
                    }
                }
            }
        }
        self.routes[id.0].set_name(Some(name.to_owned()));
        true
    }

    /// Override the class of one parameter segment (keyed as written, `:id`).
    pub fn set_param(&mut self, id: RouteId, segment: &str, class: ParamClass) -> bool {
        match self.routes.get_mut(id.0) {
            Some(route) => {
                route.set_param(segment, class);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn route(&self, id: RouteId) -> Option<&Route<C>> {
        self.routes.get(id.0)
    }

    /// Every registered route in registration order, including orphans.
    pub fn routes(&self) -> impl Iterator<Item = &Route<C>> {
        self.routes.iter()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn named_routes(&self) -> &NamedRoutes {
        &self.named
    }

    #[must_use]
    pub fn has_route(&self, name: &str) -> bool {
        self.named.has(name)
    }

    // ── Resolution ──────────────────────────────────────────────────────────

    /// Resolve a method, clean path and scheme.
    ///
    /// Never fails: an unknown method or scheme simply matches nothing that
    /// requires it.
    #[must_use]
    pub fn resolve(&self, method: &str, path: &str, scheme: &str) -> Resolution<'_, C> {
        self.resolve_request(&RequestContext::new(method, path).with_scheme(scheme))
    }

    #[must_use]
    pub fn resolve_request(&self, request: &RequestContext) -> Resolution<'_, C> {
        self.run(request, None)
    }

    /// Resolve and record every selection and matching decision.
    #[must_use]
    pub fn resolve_with_trace(&self, request: &RequestContext) -> ResolutionTrace<'_, C> {
        let mut sink = TraceSink::default();
        let resolution = self.run(request, Some(&mut sink));
        ResolutionTrace {
            resolution,
            collections: sink.collections,
            routes: sink.routes,
            used_fallback: sink.used_fallback,
        }
    }

    /// Build the URL of a named route, or return `fallback` if no route has
    /// that name.
    ///
    /// Missing arguments leave their segment empty.
    #[must_use]
    pub fn url_for(&self, name: &str, args: &UrlArgs, fallback: &str) -> String {
        match self.named.get(name) {
            Some(id) => self.build_url(id, args, fallback),
            None => {
                tracing::debug!(name, "no route with this name, using fallback");
                fallback.to_owned()
            }
        }
    }

    /// Build the URL of a route by id, under its collection's target.
    ///
    /// An orphaned route is reported and built without a target. A template
    /// whose expression does not compile is reported and still built, since
    /// building only walks segments. `fallback` is returned for an unknown id.
    #[must_use]
    pub fn build_url(&self, id: RouteId, args: &UrlArgs, fallback: &str) -> String {
        let Some(route) = self.routes.get(id.0) else {
            return fallback.to_owned();
        };
        let target = match self.collection(route.collection()) {
            Some(owner) => owner.target(),
            None => {
                self.reporter.report(&ErrorReport::from(&orphaned(route)));
                None
            }
        };
        match route.pattern(target) {
            Ok(pattern) => pattern.build(args),
            Err(e) => {
                self.reporter.report(&ErrorReport::from(&e));
                PathPattern::build_segments(&route.segments(target), args)
            }
        }
    }

    fn run<'r>(&'r self, request: &RequestContext, mut trace: Option<&mut TraceSink>) -> Resolution<'r, C> {
        let path = request.path();

        let mut selected = None;
        for collection in &self.collections {
            let step = CollectionStep {
                name: collection.name().to_owned(),
                reserved: collection.is_reserved(),
                scheme_ok: collection.scheme_allows(request.scheme()),
                host_ok: collection.host_allows(request.host()),
                prefix_ok: collection.prefix_matches(path),
            };
            // Last candidate wins.
            if step.candidate() {
                selected = Some(collection);
            }
            if let Some(sink) = trace.as_deref_mut() {
                sink.collections.push(step);
            }
        }
        if let Some(sink) = trace.as_deref_mut() {
            sink.used_fallback = selected.is_none();
        }
        let selected = selected
            .or_else(|| self.collection(DEFAULT_COLLECTION))
            .or_else(|| self.collection(ERROR_COLLECTION));

        let method = request.method().parse::<Method>().ok();
        let mut reports = Vec::new();
        let matched = match (selected, method) {
            (Some(collection), Some(method)) => self
                .scan(
                    collection,
                    method,
                    path,
                    &mut reports,
                    trace.map(|sink| &mut sink.routes),
                )
                .map(|(id, params, dispatch)| Matched {
                    route: &self.routes[id.0],
                    params,
                    dispatch,
                }),
            _ => None,
        };

        for report in &reports {
            self.reporter.report(report);
        }

        let collection = selected.map_or(ERROR_COLLECTION, Collection::name).to_owned();
        tracing::debug!(
            method = request.method(),
            path,
            collection = %collection,
            matched = matched.is_some(),
            "request resolved"
        );

        Resolution {
            collection,
            method,
            path: path.to_owned(),
            matched,
            reports,
        }
    }

    /// First route in `collection` matching the request, recording problems
    /// in `reports` and, if asked, every decision in `steps`.
    pub(crate) fn scan(
        &self,
        collection: &Collection,
        method: Method,
        path: &str,
        reports: &mut Vec<ErrorReport>,
        mut steps: Option<&mut Vec<RouteStep>>,
    ) -> Option<(RouteId, Params, Dispatch<'_, C>)> {
        for &id in collection.route_ids() {
            let Some(route) = self.routes.get(id.0) else {
                continue;
            };
            let mut hit = None;
            let verdict = if !route.methods().contains(method) {
                RouteVerdict::MethodMismatch
            } else {
                match self.collection(route.collection()) {
                    None => {
                        reports.push(ErrorReport::from(&orphaned(route)));
                        RouteVerdict::Orphaned
                    }
                    Some(owner) => match route.matches(method, path, owner.target()) {
                        Err(e) => {
                            reports.push(ErrorReport::from(&e));
                            RouteVerdict::CompileError
                        }
                        Ok(None) => RouteVerdict::PathMismatch,
                        Ok(Some(params)) => {
                            let dispatch =
                                route.dispatch(method, owner.namespace(), owner.method_prefix());
                            hit = Some((id, params, dispatch));
                            RouteVerdict::Matched
                        }
                    },
                }
            };
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(RouteStep {
                    route: id,
                    template: route.template().to_owned(),
                    verdict,
                });
            }
            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.collections.iter().position(|c| c.name() == name)
    }

    fn push_collection(&mut self, collection: Collection) -> usize {
        self.collections.push(collection);
        self.collections.len() - 1
    }

    fn invalidate_owned_by(&mut self, name: &str) {
        for route in self.routes.iter_mut().filter(|r| r.collection() == name) {
            route.invalidate();
        }
    }
}

impl<C> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("collections", &self.collections)
            .field("routes", &self.routes)
            .field("named", &self.named)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct TraceSink {
    collections: Vec<CollectionStep>,
    routes: Vec<RouteStep>,
    used_fallback: bool,
}

fn is_fallback(name: &str) -> bool {
    name == DEFAULT_COLLECTION || name == ERROR_COLLECTION
}

fn orphaned<C>(route: &Route<C>) -> TrailError {
    TrailError::OrphanedRoute {
        route: route.to_string(),
        collection: route.collection().to_owned(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Handles
// ═══════════════════════════════════════════════════════════════════════════════

/// Fluent handle to a just-registered route.
///
/// ```
/// use trail::{ParamClass, Router};
///
/// let mut router: Router = Router::new();
/// let id = router
///     .get("/posts/:id", "Posts@show")
///     .param(":id", ParamClass::Numeric)
///     .collection("blog")
///     .name("post")
///     .id();
/// assert_eq!(router.route(id).map(|r| r.collection()), Some("blog"));
/// ```
pub struct RouteMut<'r, C> {
    router: &'r mut Router<C>,
    id: RouteId,
}

impl<'r, C> RouteMut<'r, C> {
    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn route(&self) -> &Route<C> {
        &self.router.routes[self.id.0]
    }

    pub fn name(mut self, name: &str) -> Self {
        self.router.name_route(self.id, name);
        self
    }

    /// Move the route into `collection`, creating it if needed.
    pub fn collection(mut self, collection: &str) -> Self {
        self.router.assign(self.id, collection);
        self
    }

    /// Alias for [`collection`](Self::collection).
    pub fn group(self, collection: &str) -> Self {
        self.collection(collection)
    }

    pub fn param(mut self, segment: &str, class: ParamClass) -> Self {
        self.router.set_param(self.id, segment, class);
        self
    }

    /// Add methods from raw tokens, dropping unknown ones.
    pub fn methods<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.router.routes[self.id.0].validate_methods(tokens);
        self
    }
}

/// Mutable handle to a registered collection.
///
/// Dereferences to [`Collection`]. On drop, routes owned by the collection
/// discard their compiled patterns so a changed target takes effect.
pub struct CollectionMut<'r, C> {
    router: &'r mut Router<C>,
    index: usize,
}

impl<C> Deref for CollectionMut<'_, C> {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.router.collections[self.index]
    }
}

impl<C> DerefMut for CollectionMut<'_, C> {
    fn deref_mut(&mut self) -> &mut Collection {
        &mut self.router.collections[self.index]
    }
}

impl<C> Drop for CollectionMut<'_, C> {
    fn drop(&mut self) {
        let collection = &mut self.router.collections[self.index];
        if is_fallback(collection.name()) {
            collection.set_reserved(true);
        }
        let name = collection.name().to_owned();
        self.router.invalidate_owned_by(&name);
    }
}

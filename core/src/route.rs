//! `Route`: one registered method set, path template and handler.

use crate::{
    Dispatch, Handler, Method, MethodSet, ParamClass, ParamOverrides, Params, PathPattern,
    Segment, TrailError,
};
use std::fmt;
use std::sync::OnceLock;

/// Stable handle to a route inside a [`Router`](crate::Router).
///
/// Ids are dense and never reused: routes are not deleted, only detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered route.
///
/// The template is stored relative to the owning collection; the collection's
/// target is prepended when the pattern is compiled. Compilation happens on
/// first use and is cached until the route's template inputs change (new
/// owner, new parameter override, or the owner's target changing).
pub struct Route<C> {
    id: RouteId,
    methods: MethodSet,
    template: String,
    handler: Handler<C>,
    overrides: ParamOverrides,
    name: Option<String>,
    collection: String,
    compiled: OnceLock<Result<PathPattern, TrailError>>,
}

impl<C> Route<C> {
    pub(crate) fn new(
        id: RouteId,
        methods: MethodSet,
        template: &str,
        handler: Handler<C>,
        overrides: ParamOverrides,
        collection: &str,
    ) -> Self {
        Self {
            id,
            methods,
            template: template.trim().to_owned(),
            handler,
            overrides,
            name: None,
            collection: collection.to_owned(),
            compiled: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn methods(&self) -> MethodSet {
        self.methods
    }

    /// The template as registered, without the collection target.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn handler(&self) -> &Handler<C> {
        &self.handler
    }

    #[must_use]
    pub fn overrides(&self) -> &ParamOverrides {
        &self.overrides
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name of the owning collection. The collection may no longer exist.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The compiled pattern, if it has been built.
    #[must_use]
    pub fn compiled(&self) -> Option<&PathPattern> {
        self.compiled.get().and_then(|r| r.as_ref().ok())
    }

    /// Add methods from raw tokens. Unknown tokens are dropped; `all` expands.
    pub fn validate_methods<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = self.methods.union(MethodSet::from_tokens(tokens));
    }

    /// Compose the full template under `target` and compile it, once.
    pub(crate) fn pattern(&self, target: Option<&str>) -> Result<&PathPattern, TrailError> {
        self.compiled
            .get_or_init(|| PathPattern::compile(&compose(target, &self.template), &self.overrides))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Segments of the template composed under `target`, without compiling.
    pub(crate) fn segments(&self, target: Option<&str>) -> Vec<Segment> {
        PathPattern::segments_of(&compose(target, &self.template), &self.overrides)
    }

    /// Method check, then pattern match.
    ///
    /// `target` must be the owning collection's target: the pattern compiled
    /// on the first call is cached until the route is invalidated.
    pub(crate) fn matches(
        &self,
        method: Method,
        path: &str,
        target: Option<&str>,
    ) -> Result<Option<Params>, TrailError> {
        if !self.methods.contains(method) {
            return Ok(None);
        }
        Ok(self.pattern(target)?.matches(path))
    }

    pub(crate) fn dispatch(
        &self,
        method: Method,
        namespace: Option<&str>,
        prefixed: bool,
    ) -> Dispatch<'_, C> {
        match &self.handler {
            Handler::Callable(c) => Dispatch::Callable(c),
            Handler::Action(binding) => Dispatch::Action(binding.resolve(namespace, method, prefixed)),
        }
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub(crate) fn set_collection(&mut self, collection: &str) {
        collection.clone_into(&mut self.collection);
        self.invalidate();
    }

    pub(crate) fn set_param(&mut self, segment: &str, class: ParamClass) {
        self.overrides.insert(segment.to_owned(), class);
        self.invalidate();
    }

    pub(crate) fn invalidate(&mut self) {
        self.compiled = OnceLock::new();
    }
}

impl<C> fmt::Debug for Route<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("methods", &self.methods)
            .field("template", &self.template)
            .field("handler", &self.handler)
            .field("name", &self.name)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Display for Route<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.methods, self.template)
    }
}

/// Join a collection target and a relative template with exactly one `/`.
fn compose(target: Option<&str>, template: &str) -> String {
    match target {
        Some(target) => format!(
            "{}/{}",
            target.trim_end_matches('/'),
            template.trim().trim_start_matches('/')
        ),
        None => template.to_owned(),
    }
}

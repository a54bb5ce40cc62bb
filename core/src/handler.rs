//! Handler bindings: what a matched route resolves to.
//!
//! A route binds either an opaque callable (`C`, chosen by the application) or
//! an [`ActionBinding`]: a namespace plus an action name. Action bindings are
//! written in the familiar `Namespace@action` form and parsed once at
//! registration:
//!
//! | Written | Namespace | Action |
//! |---------|-----------|--------|
//! | `UserController@show` | fixed `UserController` | `show` |
//! | `{ns}@index` | collection namespace | `index` |
//! | `App\{namespace}\Home@index` | `App\` + collection namespace + `\Home` | `index` |
//! | `index` | collection namespace | `index` |
//!
//! At dispatch the namespace is filled in from the owning collection and, when
//! the collection asks for it, the action is prefixed with the lower-case
//! request method (`get_index`).

use crate::Method;
use std::fmt;

const PLACEHOLDER: &str = "{ns}";
const PLACEHOLDER_LONG: &str = "{namespace}";

/// What a route invokes.
#[derive(Clone, PartialEq, Eq)]
pub enum Handler<C> {
    /// An application-defined invocable, exposed unchanged on match.
    Callable(C),
    /// A namespace/action pair resolved against the owning collection.
    Action(ActionBinding),
}

impl<C> Handler<C> {
    /// Parse an action binding. See the module docs for accepted forms.
    #[must_use]
    pub fn action(binding: &str) -> Self {
        Self::Action(ActionBinding::parse(binding))
    }

    #[must_use]
    pub fn as_action(&self) -> Option<&ActionBinding> {
        match self {
            Self::Action(a) => Some(a),
            Self::Callable(_) => None,
        }
    }
}

impl<C> From<&str> for Handler<C> {
    fn from(binding: &str) -> Self {
        Self::action(binding)
    }
}

impl<C> From<ActionBinding> for Handler<C> {
    fn from(binding: ActionBinding) -> Self {
        Self::Action(binding)
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable(..)"),
            Self::Action(a) => f.debug_tuple("Action").field(a).finish(),
        }
    }
}

/// Where an action's namespace comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceSpec {
    /// Used as written.
    Fixed(String),
    /// The owning collection's namespace substituted between each pair of
    /// text pieces. Every placeholder occurrence is replaced.
    Inherit(Vec<String>),
}

impl NamespaceSpec {
    fn parse(raw: &str) -> Self {
        let normalized = raw.replace(PLACEHOLDER_LONG, PLACEHOLDER);
        let pieces: Vec<String> = normalized.split(PLACEHOLDER).map(str::to_owned).collect();
        if pieces.len() == 1 {
            Self::Fixed(raw.to_owned())
        } else {
            Self::Inherit(pieces)
        }
    }

    fn resolve(&self, collection_namespace: Option<&str>) -> String {
        match self {
            Self::Fixed(ns) => ns.clone(),
            Self::Inherit(pieces) => pieces.join(collection_namespace.unwrap_or("")),
        }
    }
}

/// A structured `namespace@action` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    namespace: NamespaceSpec,
    action: String,
}

impl ActionBinding {
    /// Parse `Namespace@action`, `{ns}@action` or a bare `action`.
    ///
    /// Only the first `@` separates namespace from action.
    #[must_use]
    pub fn parse(binding: &str) -> Self {
        let binding = binding.trim();
        match binding.split_once('@') {
            Some((ns, action)) => Self {
                namespace: NamespaceSpec::parse(ns),
                action: action.to_owned(),
            },
            None => Self::inherit(binding),
        }
    }

    /// An action in the owning collection's namespace.
    pub fn inherit(action: impl Into<String>) -> Self {
        Self {
            namespace: NamespaceSpec::Inherit(vec![String::new(), String::new()]),
            action: action.into(),
        }
    }

    /// An action in a fixed namespace.
    pub fn fixed(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            namespace: NamespaceSpec::Fixed(namespace.into()),
            action: action.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &NamespaceSpec {
        &self.namespace
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Resolve against a collection namespace and the request method.
    #[must_use]
    pub fn resolve(
        &self,
        collection_namespace: Option<&str>,
        method: Method,
        prefixed: bool,
    ) -> ResolvedAction {
        let action = if prefixed {
            format!("{}_{}", method.as_str(), self.action)
        } else {
            self.action.clone()
        };
        ResolvedAction {
            namespace: self.namespace.resolve(collection_namespace),
            action,
        }
    }
}

impl fmt::Display for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            NamespaceSpec::Fixed(ns) => write!(f, "{ns}@{}", self.action),
            NamespaceSpec::Inherit(pieces) => {
                write!(f, "{}@{}", pieces.join(PLACEHOLDER), self.action)
            }
        }
    }
}

/// An action binding after namespace and method-prefix resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedAction {
    pub namespace: String,
    pub action: String,
}

impl ResolvedAction {
    /// Lookup key in `namespace@action` form.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}@{}", self.namespace, self.action)
    }
}

impl fmt::Display for ResolvedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.namespace, self.action)
    }
}

/// The resolved handler of a matched route, ready for the caller to invoke.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<'a, C> {
    Callable(&'a C),
    Action(ResolvedAction),
}

impl<C> Dispatch<'_, C> {
    #[must_use]
    pub fn as_action(&self) -> Option<&ResolvedAction> {
        match self {
            Self::Action(a) => Some(a),
            Self::Callable(_) => None,
        }
    }

    #[must_use]
    pub fn as_callable(&self) -> Option<&C> {
        match self {
            Self::Callable(c) => Some(c),
            Self::Action(_) => None,
        }
    }
}
